//! Login endpoint tests.

use actix_web::test;
use serde_json::{Value, json};
use sheet_store_lib::services::auth;

use super::test_helpers::*;

async fn post_login<S>(app: &S, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_rt::test]
async fn test_login_with_valid_credentials() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, 1024).await;
    let username = unique_name("login");
    auth::create_user(&pool, &username, "a-long-password").await.unwrap();

    let (status, body) =
        post_login(&app, json!({"username": username, "password": "a-long-password"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], username.as_str());
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_rt::test]
async fn test_login_with_wrong_password_or_unknown_user() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, 1024).await;
    let username = unique_name("login");
    auth::create_user(&pool, &username, "a-long-password").await.unwrap();

    let (status, wrong) =
        post_login(&app, json!({"username": username, "password": "not-the-password"})).await;
    assert_eq!(status, 401);
    assert_eq!(wrong["error"], "Invalid username or password");

    let (status, unknown) = post_login(
        &app,
        json!({"username": unique_name("ghost"), "password": "a-long-password"}),
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(unknown, wrong);
}

#[actix_rt::test]
async fn test_login_requires_both_fields() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, 1024).await;

    let (status, body) = post_login(&app, json!({"username": "someone"})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Username and password are required");
}

#[actix_rt::test]
async fn test_login_rejects_malformed_body() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, 1024).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid request body");
}

#[actix_rt::test]
async fn test_password_reset_changes_credentials() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, 1024).await;
    let username = unique_name("reset");
    auth::create_user(&pool, &username, "first-password").await.unwrap();

    assert!(auth::reset_password(&pool, &username, "second-password").await.unwrap());

    let (status, _) =
        post_login(&app, json!({"username": username, "password": "first-password"})).await;
    assert_eq!(status, 401);

    let (status, _) =
        post_login(&app, json!({"username": username, "password": "second-password"})).await;
    assert_eq!(status, 200);
}

#[actix_rt::test]
async fn test_duplicate_username_is_rejected() {
    let pool = create_test_pool().await;
    let username = unique_name("dupe");
    auth::create_user(&pool, &username, "first-password").await.unwrap();

    let result = auth::create_user(&pool, &username, "other-password").await;
    assert!(result.is_err());
}

#[actix_rt::test]
async fn test_ready_reports_database() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool, 1024).await;

    let (status, body) = get_json(&app, "/ready").await;

    assert_eq!(status, 200);
    assert_eq!(body["database"], "connected");
}
