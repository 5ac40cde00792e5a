//! SeaORM database migrations.
//!
//! Run once at startup (or standalone via `sheet-store --migrate`) so the
//! request path never has to ensure the schema exists.

pub use sea_orm_migration::prelude::*;

mod m20251018_000001_create_uploads;
mod m20251018_000002_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251018_000001_create_uploads::Migration),
            Box::new(m20251018_000002_create_users::Migration),
        ]
    }
}
