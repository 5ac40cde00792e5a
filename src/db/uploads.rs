//! Database queries for uploaded spreadsheets.
//!
//! Listing and lookups select only the columns they return so that file bytes
//! are never loaded for a listing.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Statement,
};

use crate::entity::upload::{self, Entity as Upload};
use crate::error::{AppError, AppResult};
use crate::models::UploadSummary;

use super::DbPool;

const INSERT_UPLOAD_SQL: &str = r#"
    INSERT INTO uploads (file_blob, json_object, uploaded_by, file_name)
    VALUES ($1, $2, $3, $4)
    RETURNING id, time_stamp
"#;

/// Upload to persist. `json_object` is the serialized row array.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub file_blob: Vec<u8>,
    pub json_object: serde_json::Value,
    pub uploaded_by: String,
    pub file_name: Option<String>,
}

/// Values the database assigned to a new upload.
#[derive(Debug, Clone, Copy)]
pub struct InsertedUpload {
    pub id: i32,
    pub time_stamp: DateTime<Utc>,
}

/// Insert an upload on the given connection and return its id and timestamp.
pub async fn insert_upload<C>(conn: &C, upload: NewUpload) -> AppResult<InsertedUpload>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        INSERT_UPLOAD_SQL,
        [
            upload.file_blob.into(),
            upload.json_object.into(),
            upload.uploaded_by.into(),
            upload.file_name.into(),
        ],
    );

    let row = conn
        .query_one_raw(stmt)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert upload: {}", e)))?
        .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))?;

    Ok(InsertedUpload {
        id: row.try_get("", "id")?,
        time_stamp: row.try_get("", "time_stamp")?,
    })
}

impl DbPool {
    /// Get the stored file bytes and file name of an upload.
    pub async fn get_upload_file(&self, id: i32) -> AppResult<Option<(Vec<u8>, Option<String>)>> {
        let result = Upload::find_by_id(id)
            .select_only()
            .columns([upload::Column::FileBlob, upload::Column::FileName])
            .into_tuple::<(Vec<u8>, Option<String>)>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get upload file: {}", e)))?;

        Ok(result)
    }

    /// Get the stored parsed rows of an upload.
    pub async fn get_upload_json(&self, id: i32) -> AppResult<Option<serde_json::Value>> {
        let result = Upload::find_by_id(id)
            .select_only()
            .column(upload::Column::JsonObject)
            .into_tuple::<serde_json::Value>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get upload JSON: {}", e)))?;

        Ok(result)
    }

    /// List one page of an uploader's uploads, most recent first.
    ///
    /// `page` is 1-based. Returns the page and the uploader's total count. A
    /// page past the last one is empty.
    pub async fn list_uploads_by_user(
        &self,
        uploaded_by: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<(Vec<UploadSummary>, u64)> {
        let total = Upload::find()
            .filter(upload::Column::UploadedBy.eq(uploaded_by))
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count uploads: {}", e)))?;

        let Some(offset) = page_offset(page, page_size, total) else {
            return Ok((Vec::new(), total));
        };

        let uploads = Upload::find()
            .select_only()
            .columns([
                upload::Column::Id,
                upload::Column::FileName,
                upload::Column::UploadedBy,
                upload::Column::TimeStamp,
            ])
            .filter(upload::Column::UploadedBy.eq(uploaded_by))
            .order_by_desc(upload::Column::TimeStamp)
            .order_by_desc(upload::Column::Id)
            .limit(page_size)
            .offset(offset)
            .into_model::<UploadSummary>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list uploads: {}", e)))?;

        Ok((uploads, total))
    }
}

/// Row offset of a 1-based page, or `None` when the page starts past the
/// last record.
fn page_offset(page: u64, page_size: u64, total: u64) -> Option<u64> {
    let offset = page.saturating_sub(1).checked_mul(page_size)?;
    (offset < total).then_some(offset)
}
