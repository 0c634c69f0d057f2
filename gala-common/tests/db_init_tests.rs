//! Tests for database initialization
//!
//! Covers automatic creation of the database file, idempotent schema setup
//! and the single-connection in-memory database used by service tests.

use gala_common::db::init::{create_tickets_table, init_database, init_memory_database};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("gala.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("gala.db");

    let pool1 = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO tickets (id, code) VALUES ('a', 'GAL-12345')")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    // Re-opening must keep existing rows
    let pool2 = init_database(&db_path).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_tickets_table_has_expected_columns() {
    let pool = init_memory_database().await.unwrap();

    let columns: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info('tickets')")
        .fetch_all(&pool)
        .await
        .unwrap();
    let names: Vec<&str> = columns.iter().map(|(n,)| n.as_str()).collect();

    assert_eq!(names, vec!["id", "code", "issued_at", "created_at"]);
}

#[tokio::test]
async fn test_schema_creation_is_idempotent() {
    let pool = init_memory_database().await.unwrap();

    create_tickets_table(&pool).await.unwrap();
    create_tickets_table(&pool).await.unwrap();

    let index: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND name = 'idx_tickets_code'",
    )
    .fetch_optional(&pool)
    .await
    .unwrap();
    assert!(index.is_some(), "code index should exist");
}

#[tokio::test]
async fn test_memory_database_shares_rows_across_queries() {
    let pool = init_memory_database().await.unwrap();

    sqlx::query("INSERT INTO tickets (id, code) VALUES ('x', 'GAL-10000')")
        .execute(&pool)
        .await
        .unwrap();

    let code: String = sqlx::query_scalar("SELECT code FROM tickets WHERE id = 'x'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(code, "GAL-10000");
}
