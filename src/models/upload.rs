//! Upload request and response models.

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::Serialize;
use utoipa::ToSchema;

/// Response for a successful spreadsheet upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub data: UploadData,
}

/// Details of a stored upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub id: i32,
    pub uploaded_by: String,
    pub file_name: Option<String>,
    /// Number of data rows parsed from the first sheet
    pub row_count: usize,
    pub time_stamp: DateTime<Utc>,
}

/// Stored parsed rows of one upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadJsonResponse {
    pub id: i32,
    /// Array of row objects exactly as stored at upload time
    #[schema(value_type = Object)]
    pub json: serde_json::Value,
}

/// Listing row; file bytes and parsed rows are not included.
#[derive(Debug, Clone, Serialize, FromQueryResult, ToSchema)]
pub struct UploadSummary {
    pub id: i32,
    pub file_name: Option<String>,
    pub uploaded_by: String,
    pub time_stamp: DateTime<Utc>,
}

/// One page of an uploader's uploads.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadListResponse {
    pub uploaded_by: String,
    pub page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub uploads: Vec<UploadSummary>,
}
