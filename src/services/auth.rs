//! User authentication and account management.

use tracing::{info, warn};

use crate::auth::{self, PasswordPolicy};
use crate::db::{DbPool, users};
use crate::entity::user;
use crate::error::{AppError, AppResult};

/// Check a username and password against the stored credentials.
///
/// Unknown users and wrong passwords produce the same error, and both paths
/// run one password verification.
pub async fn authenticate(pool: &DbPool, username: &str, password: &str) -> AppResult<user::Model> {
    let user = users::find_by_username(pool.connection(), username).await?;

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password = password.to_string();
    let verified = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => auth::verify_password(&password, &hash),
        None => auth::verify_unknown_user(&password),
    })
    .await
    .map_err(|e| AppError::Internal {
        operation: "Login failed",
        message: format!("Verification task failed: {}", e),
    })?;

    match user {
        Some(user) if verified => {
            info!(username = %user.username, "User logged in");
            Ok(user)
        }
        _ => {
            warn!(username = %username, "Failed login attempt");
            Err(AppError::Unauthorized("Authentication failed".to_string()))
        }
    }
}

/// Create a user account.
pub async fn create_user(pool: &DbPool, username: &str, password: &str) -> AppResult<user::Model> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::invalid_input(
            "Invalid username",
            "Username must not be empty",
        ));
    }

    let password_hash = hash_with_policy(password).await?;
    let user = users::create(pool.connection(), username, &password_hash).await?;

    info!(username = %user.username, "User created");
    Ok(user)
}

/// Replace a user's password. Returns false if the user does not exist.
pub async fn reset_password(pool: &DbPool, username: &str, password: &str) -> AppResult<bool> {
    let password_hash = hash_with_policy(password).await?;
    let updated = users::update_password(pool.connection(), username, &password_hash).await?;

    if updated {
        info!(username = %username, "Password reset");
    }
    Ok(updated)
}

/// List all user accounts.
pub async fn list_users(pool: &DbPool) -> AppResult<Vec<user::Model>> {
    users::list(pool.connection()).await
}

async fn hash_with_policy(password: &str) -> AppResult<String> {
    PasswordPolicy::default().validate(password)?;

    let password = password.to_string();
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal {
            operation: "Password hashing failed",
            message: format!("Hashing task failed: {}", e),
        })?
}
