//! Login endpoint.

use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, LoginResponse, LoginUser};
use crate::services::auth as auth_service;

/// Log in with a username and password.
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Missing username or password", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    pool: web::Data<DbPool>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let (username, password) = body.credentials().ok_or_else(|| {
        AppError::invalid_input(
            "Username and password are required",
            "Provide both username and password",
        )
    })?;

    let user = auth_service::authenticate(&pool, username, password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        user: LoginUser {
            username: user.username,
        },
    }))
}

/// Configure auth routes under the `/auth` scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)));
}
