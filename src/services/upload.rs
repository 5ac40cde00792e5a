//! Spreadsheet upload service.
//!
//! Reads the multipart form, decodes the workbook off the async runtime and
//! stores the original bytes together with the parsed rows.

use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{info, warn};

use crate::db::DbPool;
use crate::db::uploads::{self, NewUpload};
use crate::error::{AppError, AppResult};
use crate::models::{UploadData, UploadResponse};
use crate::services::spreadsheet;

/// Form field carrying the workbook.
pub const FILE_FIELD: &str = "excelFile";

/// Form field naming the uploader.
pub const UPLOADED_BY_FIELD: &str = "uploadedBy";

/// Uploader recorded when the form names none.
pub const DEFAULT_UPLOADER: &str = "anonymous";

/// Room left for boundaries and small text fields when checking the declared
/// request length against the file limit.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Largest accepted text field.
const MAX_TEXT_FIELD_SIZE: usize = 16 * 1024;

/// Upload limits shared with the handler through app data.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_size: usize,
}

/// File part of the form.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields read from the upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub uploaded_by: Option<String>,
}

impl UploadForm {
    /// Uploader name exactly as submitted, or the default when the field is
    /// missing or empty.
    pub fn uploader(&self) -> String {
        self.uploaded_by
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_UPLOADER)
            .to_string()
    }
}

/// Read the upload form.
///
/// The file's declared content type is checked before any of its bytes are
/// buffered, and the file is rejected as soon as it grows past
/// `max_file_size`. Unknown fields are drained and ignored.
pub async fn read_upload_form(mut payload: Multipart, max_file_size: usize) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| AppError::invalid_input("Invalid upload", format!("Multipart error: {}", e)))?;

        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .map(str::to_string);

        match field_name.as_deref() {
            Some(FILE_FIELD) => {
                if form.file.is_some() {
                    return Err(AppError::invalid_input(
                        "Invalid upload",
                        "Only one file may be uploaded at a time",
                    ));
                }

                let allowed = field
                    .content_type()
                    .is_some_and(|mime| spreadsheet::is_spreadsheet_content_type(mime.essence_str()));
                if !allowed {
                    return Err(AppError::invalid_input(
                        "Invalid file type",
                        "Only Excel files (.xlsx, .xls) are allowed",
                    ));
                }

                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);

                let bytes = read_field(&mut field, max_file_size).await.map_err(|e| match e {
                    AppError::PayloadTooLarge(_) => AppError::PayloadTooLarge(format!(
                        "File exceeds the maximum size of {} MB",
                        max_file_size / 1024 / 1024
                    )),
                    other => other,
                })?;

                form.file = Some(UploadedFile { file_name, bytes });
            }
            Some(UPLOADED_BY_FIELD) => {
                let bytes = read_field(&mut field, MAX_TEXT_FIELD_SIZE).await?;
                let value = String::from_utf8(bytes).map_err(|_| {
                    AppError::invalid_input("Invalid upload", "uploadedBy must be valid UTF-8")
                })?;
                form.uploaded_by = Some(value);
            }
            _ => drain_field(&mut field).await,
        }
    }

    Ok(form)
}

/// Buffer one field, failing once it exceeds `limit` bytes.
async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| AppError::invalid_input("Invalid upload", format!("Read error: {}", e)))?;
        if data.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge(format!(
                "Field exceeds {} bytes",
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

/// Consume the rest of a field without keeping it.
async fn drain_field(field: &mut Field) {
    while let Some(chunk) = field.next().await {
        if chunk.is_err() {
            break;
        }
    }
}

/// Reject requests whose declared length already exceeds the limit.
fn check_declared_length(req: &HttpRequest, max_file_size: usize) -> AppResult<()> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok());

    match declared {
        Some(length) if length > max_file_size.saturating_add(MULTIPART_OVERHEAD) => {
            warn!("Upload rejected: declared length {} bytes", length);
            Err(AppError::PayloadTooLarge(format!(
                "File exceeds the maximum size of {} MB",
                max_file_size / 1024 / 1024
            )))
        }
        _ => Ok(()),
    }
}

/// Upload a spreadsheet.
///
/// POST /uploads/upload-excel
/// Content-Type: multipart/form-data
#[utoipa::path(
    post,
    path = "/uploads/upload-excel",
    tag = "Uploads",
    request_body(
        content_type = "multipart/form-data",
        description = "`excelFile`: the workbook (.xlsx or .xls); `uploadedBy`: optional uploader name"
    ),
    responses(
        (status = 200, description = "Spreadsheet stored", body = UploadResponse),
        (status = 400, description = "Missing file, wrong file type or no data rows", body = crate::error::ErrorResponse),
        (status = 413, description = "File larger than the upload limit", body = crate::error::ErrorResponse),
        (status = 500, description = "Decoding or storage failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_excel(
    req: HttpRequest,
    payload: Multipart,
    pool: web::Data<DbPool>,
    limits: web::Data<UploadLimits>,
) -> AppResult<HttpResponse> {
    check_declared_length(&req, limits.max_file_size)?;

    let form = read_upload_form(payload, limits.max_file_size).await?;
    let uploaded_by = form.uploader();
    let file = form
        .file
        .ok_or_else(|| AppError::invalid_input("No file uploaded", "Please upload an Excel file"))?;

    let response = store_upload(&pool, file, uploaded_by)
        .await
        .map_err(|e| e.during("Upload failed"))?;

    Ok(HttpResponse::Ok().json(response))
}

/// Decode a workbook and persist it with its rows.
///
/// The insert runs on a scoped connection that is committed on success and
/// rolled back on every failure path.
pub async fn store_upload(
    pool: &DbPool,
    file: UploadedFile,
    uploaded_by: String,
) -> AppResult<UploadResponse> {
    let UploadedFile { file_name, bytes } = file;
    let file_size = bytes.len();

    let (bytes, parsed) = tokio::task::spawn_blocking(move || {
        let parsed = spreadsheet::parse_first_sheet(&bytes);
        (bytes, parsed)
    })
    .await
    .map_err(|e| AppError::Internal {
        operation: "Upload failed",
        message: format!("Spreadsheet task failed: {}", e),
    })?;
    let rows = parsed?;

    if rows.is_empty() {
        return Err(AppError::invalid_input(
            "Empty file",
            "The Excel file contains no data",
        ));
    }

    let row_count = rows.len();
    let json_object = Value::Array(rows.into_iter().map(Value::Object).collect());

    let scoped = pool.acquire().await?;
    let inserted = uploads::insert_upload(
        scoped.connection(),
        NewUpload {
            file_blob: bytes,
            json_object,
            uploaded_by: uploaded_by.clone(),
            file_name: file_name.clone(),
        },
    )
    .await?;
    scoped.commit().await?;

    info!(
        upload_id = inserted.id,
        uploaded_by = %uploaded_by,
        rows = row_count,
        bytes = file_size,
        "Stored spreadsheet upload"
    );

    Ok(UploadResponse {
        success: true,
        message: "File uploaded successfully".to_string(),
        data: UploadData {
            id: inserted.id,
            uploaded_by,
            file_name,
            row_count,
            time_stamp: inserted.time_stamp,
        },
    })
}
