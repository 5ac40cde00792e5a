//! SeaORM entity definitions for PostgreSQL database.

pub mod upload;
pub mod user;
