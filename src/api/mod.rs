//! API endpoint modules.

use actix_web::{HttpResponse, web};

use crate::error::{AppError, AppResult};

pub mod auth;
pub mod health;
pub mod openapi;
pub mod uploads;

pub use auth::configure_routes as configure_auth_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use uploads::configure_routes as configure_upload_routes;

/// JSON body extraction settings; malformed bodies are reported as JSON 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::invalid_input("Invalid request body", err.to_string()).into()
    })
}

/// Query string extraction settings; malformed queries are reported as JSON 400s.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::invalid_input("Invalid query", err.to_string()).into()
    })
}

/// Fallback for unmatched routes.
pub async fn route_not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("Route not found".to_string()))
}
