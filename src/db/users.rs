//! Database operations for users.

use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::entity::user::{self, Entity as User};
use crate::error::{AppError, AppResult};

/// Find a user by exact username.
pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> AppResult<Option<user::Model>> {
    let result = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    Ok(result)
}

/// Create a user with an already-hashed password.
pub async fn create(
    db: &DatabaseConnection,
    username: &str,
    password_hash: &str,
) -> AppResult<user::Model> {
    let model = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(password_hash.to_string()),
        ..Default::default()
    };

    model.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::invalid_input(
            "Username already exists",
            format!("A user named '{}' already exists", username),
        ),
        _ => AppError::from(e),
    })
}

/// List all users ordered by username.
pub async fn list(db: &DatabaseConnection) -> AppResult<Vec<user::Model>> {
    let result = User::find()
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?;

    Ok(result)
}

/// Replace a user's password hash. Returns false if no such user exists.
pub async fn update_password(
    db: &DatabaseConnection,
    username: &str,
    password_hash: &str,
) -> AppResult<bool> {
    let result = User::update_many()
        .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
        .filter(user::Column::Username.eq(username))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}
