//! Domain error types for the spreadsheet store.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.
//! Every variant renders as a JSON `ErrorResponse`, including failures of the
//! binary download endpoint.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or invalid request data
    #[error("{error}: {message}")]
    InvalidInput { error: &'static str, message: String },

    /// Uploaded file exceeds the configured limit
    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    /// No matching record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credential mismatch
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Spreadsheet could not be decoded
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Internal failure tagged with the operation that hit it
    #[error("{operation}: {message}")]
    Internal {
        operation: &'static str,
        message: String,
    },
}

impl AppError {
    /// Shorthand for a 400 with a title and a human-readable message.
    pub fn invalid_input(error: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            error,
            message: message.into(),
        }
    }

    /// Tag a server-side failure with the operation that produced it.
    ///
    /// The resulting response carries `operation` as its `error` title and the
    /// underlying message. Client-facing variants pass through unchanged.
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            AppError::Database(message) | AppError::Spreadsheet(message) => {
                AppError::Internal { operation, message }
            }
            other => other,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Spreadsheet(_) | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            AppError::InvalidInput { error, message } => (error.to_string(), message.clone()),
            AppError::PayloadTooLarge(message) => ("File too large".to_string(), message.clone()),
            AppError::NotFound(message) => ("Not found".to_string(), message.clone()),
            AppError::Unauthorized(message) => {
                ("Invalid username or password".to_string(), message.clone())
            }
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                (
                    "Internal server error".to_string(),
                    "An internal database error occurred".to_string(),
                )
            }
            AppError::Spreadsheet(err_str) => {
                tracing::error!("Spreadsheet error: {}", err_str);
                (
                    "Internal server error".to_string(),
                    "The spreadsheet could not be processed".to_string(),
                )
            }
            AppError::Internal { operation, message } => {
                tracing::error!("{}: {}", operation, message);
                (operation.to_string(), message.clone())
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse { error, message })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<calamine::Error> for AppError {
    fn from(err: calamine::Error) -> Self {
        AppError::Spreadsheet(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal {
            operation: "Serialization failed",
            message: err.to_string(),
        }
    }
}
