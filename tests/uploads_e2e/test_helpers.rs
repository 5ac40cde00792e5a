//! Shared test helpers for upload E2E tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use sheet_store_lib::api;
use sheet_store_lib::config::Config;
use sheet_store_lib::db::DbPool;
use sheet_store_lib::services::UploadLimits;
use sheet_store_lib::services::spreadsheet::XLSX_CONTENT_TYPE;
use std::sync::OnceLock;
use uuid::Uuid;

static MIGRATIONS_RUN: OnceLock<()> = OnceLock::new();

const BOUNDARY: &str = "uploads-e2e-boundary";

/// Create a fresh DB pool. Migrations run only once.
pub async fn create_test_pool() -> DbPool {
    let mut config = Config::from_env().expect(
        "Failed to load config. Ensure DATABASE_URL or the PG* variables are set, \
         and that PostgreSQL is running.",
    );
    config.database.max_connections = 2;
    config.database.min_connections = 1;

    let pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");

    if MIGRATIONS_RUN.get().is_none() {
        pool.run_migrations()
            .await
            .expect("Failed to run migrations");
        let _ = MIGRATIONS_RUN.set(());
    }

    pool
}

/// Generate a unique uploader or username for test isolation.
pub fn unique_name(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        Uuid::new_v4().to_string().split('-').next().unwrap()
    )
}

/// Create a test app with the production route layout.
pub async fn create_test_app(
    pool: &DbPool,
    max_file_size: usize,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(UploadLimits { max_file_size }))
            .app_data(api::json_config())
            .app_data(api::query_config())
            .configure(api::configure_health_routes)
            .service(web::scope("/auth").configure(api::configure_auth_routes))
            .service(web::scope("/uploads").configure(api::configure_upload_routes)),
    )
    .await
}

/// Build an xlsx workbook whose first sheet holds `rows` as text cells.
pub fn workbook(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Multipart file part.
pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> FilePart<'a> {
    pub fn xlsx(file_name: &'a str, data: &'a [u8]) -> Self {
        FilePart {
            file_name,
            content_type: XLSX_CONTENT_TYPE,
            data,
        }
    }

    /// File part sent without a `filename` parameter.
    pub fn unnamed_xlsx(data: &'a [u8]) -> Self {
        FilePart::xlsx("", data)
    }
}

/// Encode an upload form body and its content type header.
pub fn upload_form(file: Option<FilePart<'_>>, uploaded_by: Option<&str>) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    if let Some(uploaded_by) = uploaded_by {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"uploadedBy\"\r\n\r\n{}\r\n",
                BOUNDARY, uploaded_by
            )
            .as_bytes(),
        );
    }

    if let Some(file) = file {
        let file_name = if file.file_name.is_empty() {
            String::new()
        } else {
            format!("; filename=\"{}\"", file.file_name)
        };
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"excelFile\"{}\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}

/// POST an upload form. Returns status and JSON body.
pub async fn post_upload<S>(
    app: &S,
    file: Option<FilePart<'_>>,
    uploaded_by: Option<&str>,
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (content_type, body) = upload_form(file, uploaded_by);
    let req = test::TestRequest::post()
        .uri("/uploads/upload-excel")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Upload a small workbook for `uploaded_by` and return its id.
pub async fn upload_workbook<S>(app: &S, uploaded_by: &str, file_name: &str) -> i64
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let data = workbook(&[&["name", "city"], &["Ada", "London"]]);
    let (status, body) = post_upload(app, Some(FilePart::xlsx(file_name, &data)), Some(uploaded_by)).await;
    assert_eq!(status, 200, "upload failed: {}", body);
    body["data"]["id"].as_i64().expect("upload id")
}

/// GET a JSON endpoint. Returns status and JSON body.
pub async fn get_json<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}
