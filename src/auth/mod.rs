//! Password hashing for login credentials.
//!
//! Passwords are stored as Argon2id PHC strings with a per-user random salt.
//! Verification goes through the Argon2 verifier, which compares digests in
//! constant time. All functions here are CPU-heavy and synchronous; callers on
//! the request path run them on the blocking pool.

use std::sync::OnceLock;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::warn;

use crate::error::{AppError, AppResult};

/// Length bounds for new passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        PasswordPolicy {
            min_length: 8,
            max_length: 128,
        }
    }
}

impl PasswordPolicy {
    /// Check a password chosen by an administrator for a new or reset account.
    pub fn validate(&self, password: &str) -> AppResult<()> {
        let length = password.chars().count();

        if length < self.min_length {
            return Err(AppError::invalid_input(
                "Password too short",
                format!("Password must be at least {} characters", self.min_length),
            ));
        }

        if length > self.max_length {
            return Err(AppError::invalid_input(
                "Password too long",
                format!("Password must be at most {} characters", self.max_length),
            ));
        }

        Ok(())
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        // Argon's error type doesn't implement std::error::Error.
        .map_err(|e| AppError::Internal {
            operation: "Password hashing failed",
            message: e.to_string(),
        })
}

/// Check a password against a stored PHC string.
///
/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Spend the same work as a real verification for a username that does not
/// exist, so unknown users and wrong passwords take comparable time.
pub fn verify_unknown_user(password: &str) -> bool {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("unknown-user-placeholder").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(password, hash);
    }
    false
}
