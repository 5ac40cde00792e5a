//! Schema shape tests.

use sea_orm::Value;

use super::test_helpers::*;

const COLUMN_SQL: &str = r#"
    SELECT data_type::text AS data_type, is_nullable::text AS is_nullable
    FROM information_schema.columns
    WHERE table_schema = current_schema() AND table_name = 'uploads' AND column_name = $1
"#;

async fn column(pool: &sheet_store_lib::db::DbPool, name: &str) -> (String, String) {
    let rows = pool
        .execute(COLUMN_SQL, [Value::from(name.to_string())])
        .await
        .expect("column lookup failed");
    let row = rows.first().unwrap_or_else(|| panic!("column {} missing", name));
    (
        row.try_get("", "data_type").unwrap(),
        row.try_get("", "is_nullable").unwrap(),
    )
}

#[actix_rt::test]
async fn test_uploads_columns_match_entity() {
    let pool = create_test_pool().await;

    assert_eq!(
        column(&pool, "time_stamp").await,
        ("timestamp with time zone".to_string(), "NO".to_string())
    );
    assert_eq!(
        column(&pool, "uploaded_by").await,
        ("text".to_string(), "NO".to_string())
    );
    assert_eq!(column(&pool, "json_object").await.0, "jsonb");
    assert_eq!(column(&pool, "file_blob").await.0, "bytea");
}
