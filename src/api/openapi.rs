//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sheet Store Server",
        version = "0.1.0",
        description = "API server for uploading Excel spreadsheets and serving their parsed rows"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Upload endpoints
        services::upload::upload_excel,
        api::uploads::download_upload,
        api::uploads::get_upload_json,
        api::uploads::list_user_uploads,
        // Auth endpoints
        api::auth::login,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Uploads
            models::UploadResponse,
            models::UploadData,
            models::UploadJsonResponse,
            models::UploadSummary,
            models::UploadListResponse,
            // Auth
            models::LoginRequest,
            models::LoginResponse,
            models::LoginUser,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Uploads", description = "Spreadsheet upload and retrieval"),
        (name = "Auth", description = "Username and password login")
    )
)]
pub struct ApiDoc;
