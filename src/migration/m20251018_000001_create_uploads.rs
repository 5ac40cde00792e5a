//! Migration: Create uploads table.
//!
//! Stores each uploaded spreadsheet as raw bytes alongside its parsed rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE uploads (
                    id SERIAL PRIMARY KEY,
                    file_blob BYTEA NOT NULL,              -- exact bytes as submitted
                    json_object JSONB NOT NULL,            -- array of row objects
                    uploaded_by TEXT NOT NULL DEFAULT 'anonymous',
                    file_name TEXT,                        -- client-supplied name
                    time_stamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Listing by uploader, most recent first
                CREATE INDEX idx_uploads_uploaded_by_time_stamp
                    ON uploads(uploaded_by, time_stamp DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP INDEX IF EXISTS idx_uploads_uploaded_by_time_stamp;
                DROP TABLE IF EXISTS uploads CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
