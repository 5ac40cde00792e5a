//! Download, JSON and listing endpoint tests.

use actix_web::test;
use chrono::DateTime;

use super::test_helpers::*;

const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[actix_rt::test]
async fn test_download_returns_original_bytes() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;

    let data = workbook(&[&["sku", "qty"], &["A-1", "3"]]);
    let (status, body) = post_upload(
        &app,
        Some(FilePart::xlsx("inventory.xlsx", &data)),
        Some(unique_name("dl").as_str()),
    )
    .await;
    assert_eq!(status, 200);
    let id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/uploads/{}/download", id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("inventory.xlsx"));

    let bytes = test::read_body(resp).await;
    assert_eq!(bytes.as_ref(), data.as_slice());
}

#[actix_rt::test]
async fn test_download_without_stored_name_uses_fallback() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;

    let data = workbook(&[&["k"], &["v"]]);
    let (status, body) = post_upload(
        &app,
        Some(FilePart::unnamed_xlsx(&data)),
        Some(unique_name("noname").as_str()),
    )
    .await;
    assert_eq!(status, 200, "unexpected body: {}", body);
    assert!(body["data"]["fileName"].is_null());
    let id = body["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/uploads/{}/download", id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(
        disposition.contains(&format!("upload_{}.xlsx", id)),
        "unexpected disposition: {}",
        disposition
    );
}

#[actix_rt::test]
async fn test_unknown_id_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;

    let (status, body) = get_json(&app, "/uploads/999999999/download").await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "No file found");

    let (status, body) = get_json(&app, "/uploads/999999999/json").await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "No JSON found");
}

#[actix_rt::test]
async fn test_non_integer_id_is_rejected() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;

    let (status, body) = get_json(&app, "/uploads/abc/json").await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid id");
}

#[actix_rt::test]
async fn test_listing_paginates_newest_first() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;
    let uploader = unique_name("pager");

    let mut ids = Vec::new();
    for i in 0..7 {
        ids.push(upload_workbook(&app, &uploader, &format!("file-{}.xlsx", i)).await);
    }

    let (status, page1) = get_json(&app, &format!("/uploads/user/{}?page=1", uploader)).await;
    assert_eq!(status, 200);
    assert_eq!(page1["uploadedBy"], uploader.as_str());
    assert_eq!(page1["total"], 7);
    assert_eq!(page1["totalPages"], 2);
    assert_eq!(page1["pageSize"], 5);
    assert_eq!(page1["page"], 1);

    let uploads = page1["uploads"].as_array().unwrap();
    assert_eq!(uploads.len(), 5);
    assert_eq!(uploads[0]["id"].as_i64().unwrap(), ids[6]);
    assert!(uploads[0].get("file_blob").is_none());
    assert!(uploads[0].get("json_object").is_none());
    for pair in uploads.windows(2) {
        let newer = DateTime::parse_from_rfc3339(pair[0]["time_stamp"].as_str().unwrap()).unwrap();
        let older = DateTime::parse_from_rfc3339(pair[1]["time_stamp"].as_str().unwrap()).unwrap();
        assert!(newer >= older, "{} listed before {}", newer, older);
    }

    let (_, page2) = get_json(&app, &format!("/uploads/user/{}?page=2", uploader)).await;
    let uploads = page2["uploads"].as_array().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[1]["id"].as_i64().unwrap(), ids[0]);

    let (_, page3) = get_json(&app, &format!("/uploads/user/{}?page=3", uploader)).await;
    assert_eq!(page3["uploads"].as_array().unwrap().len(), 0);
    assert_eq!(page3["total"], 7);
}

#[actix_rt::test]
async fn test_listing_unknown_uploader_is_empty() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;

    let (status, body) =
        get_json(&app, &format!("/uploads/user/{}", unique_name("nobody"))).await;

    assert_eq!(status, 200);
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["page"], 1);
    assert!(body["uploads"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_listing_page_is_clamped_or_rejected() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;
    let uploader = unique_name("clamp");
    upload_workbook(&app, &uploader, "one.xlsx").await;

    let (status, body) = get_json(&app, &format!("/uploads/user/{}?page=0", uploader)).await;
    assert_eq!(status, 200);
    assert_eq!(body["page"], 1);
    assert_eq!(body["uploads"].as_array().unwrap().len(), 1);

    let (status, body) = get_json(&app, &format!("/uploads/user/{}?page=two", uploader)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid page");
}

#[actix_rt::test]
async fn test_listing_far_past_last_page_is_empty() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, MAX_FILE_SIZE).await;
    let uploader = unique_name("farpage");
    upload_workbook(&app, &uploader, "one.xlsx").await;

    for page in ["9223372036854775807", "2000000000000000000", "18446744073709551615"] {
        let (status, body) =
            get_json(&app, &format!("/uploads/user/{}?page={}", uploader, page)).await;

        assert_eq!(status, 200, "page {} failed: {}", page, body);
        assert_eq!(body["total"], 1);
        assert_eq!(body["totalPages"], 1);
        assert!(body["uploads"].as_array().unwrap().is_empty());
    }
}
