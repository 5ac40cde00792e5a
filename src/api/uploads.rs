//! Stored upload access endpoints.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{PAGE_SIZE, PageQuery, Pagination, UploadJsonResponse, UploadListResponse};
use crate::services::spreadsheet::XLSX_CONTENT_TYPE;
use crate::services::upload::upload_excel;

fn parse_upload_id(raw: &str) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::invalid_input("Invalid id", "Upload id must be an integer"))
}

/// Attachment name used when an upload was stored without one.
fn fallback_file_name(id: i32) -> String {
    format!("upload_{}.xlsx", id)
}

/// Download the original file of an upload.
///
/// GET /uploads/{id}/download
#[utoipa::path(
    get,
    path = "/uploads/{id}/download",
    tag = "Uploads",
    params(("id" = i32, Path, description = "Upload id")),
    responses(
        (status = 200, description = "Original file bytes", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Id is not an integer", body = crate::error::ErrorResponse),
        (status = 404, description = "No such upload", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn download_upload(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_upload_id(&path)?;

    let (bytes, file_name) = pool
        .get_upload_file(id)
        .await
        .map_err(|e| e.during("Failed to download file"))?
        .ok_or_else(|| AppError::NotFound("No file found".to_string()))?;

    let file_name = file_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback_file_name(id));

    Ok(HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}

/// Get the parsed rows of an upload.
///
/// GET /uploads/{id}/json
#[utoipa::path(
    get,
    path = "/uploads/{id}/json",
    tag = "Uploads",
    params(("id" = i32, Path, description = "Upload id")),
    responses(
        (status = 200, description = "Stored row objects", body = UploadJsonResponse),
        (status = 400, description = "Id is not an integer", body = crate::error::ErrorResponse),
        (status = 404, description = "No such upload", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_upload_json(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_upload_id(&path)?;

    let json = pool
        .get_upload_json(id)
        .await
        .map_err(|e| e.during("Failed to fetch JSON"))?
        .ok_or_else(|| AppError::NotFound("No JSON found".to_string()))?;

    Ok(HttpResponse::Ok().json(UploadJsonResponse { id, json }))
}

/// List an uploader's uploads, most recent first, five per page.
///
/// GET /uploads/user/{uploaded_by}?page=N
#[utoipa::path(
    get,
    path = "/uploads/user/{uploaded_by}",
    tag = "Uploads",
    params(
        ("uploaded_by" = String, Path, description = "Uploader name"),
        PageQuery
    ),
    responses(
        (status = 200, description = "One page of uploads", body = UploadListResponse),
        (status = 400, description = "Page is not an integer", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_user_uploads(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let uploaded_by = path.into_inner();
    let page = query.page()?;

    let (uploads, total) = pool
        .list_uploads_by_user(&uploaded_by, page, PAGE_SIZE)
        .await
        .map_err(|e| e.during("Failed to fetch uploads"))?;

    let pagination = Pagination::new(page, PAGE_SIZE, total);

    Ok(HttpResponse::Ok().json(UploadListResponse {
        uploaded_by,
        page: pagination.page,
        total: pagination.total,
        total_pages: pagination.total_pages,
        page_size: pagination.page_size,
        uploads,
    }))
}

/// Configure upload routes under the `/uploads` scope.
///
/// Literal segments are registered before `{id}` routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/upload-excel").route(web::post().to(upload_excel)))
        .service(web::resource("/user/{uploaded_by}").route(web::get().to(list_user_uploads)))
        .service(web::resource("/{id}/download").route(web::get().to(download_upload)))
        .service(web::resource("/{id}/json").route(web::get().to(get_upload_json)));
}
