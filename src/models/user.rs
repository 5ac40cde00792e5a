//! Login request and response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login request body. Both fields are required; they are optional here so
/// that a missing field is reported as a client error with a JSON body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both credentials, if present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: LoginUser,
}

/// Public view of the authenticated user.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginUser {
    pub username: String,
}
