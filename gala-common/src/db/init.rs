//! Database initialization
//!
//! Opens (or creates) the SQLite database and ensures the ticket schema
//! exists. Schema creation is idempotent and runs on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets listing/verify reads proceed while a batch write commits
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_tickets_table(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the ticket schema
///
/// Limited to one connection: every SQLite `:memory:` connection is its own
/// database, so a larger pool would scatter rows across connections.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    create_tickets_table(&pool).await?;

    Ok(pool)
}

/// Create the tickets table
///
/// One row per issued ticket. `issued_at` is the write-time timestamp and
/// `created_at` its ISO-8601 rendering kept for external readers; both are
/// nullable so rows written by other tools still list.
pub async fn create_tickets_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            id TEXT PRIMARY KEY,
            code TEXT NOT NULL,
            issued_at TEXT,
            created_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tickets_code ON tickets(code)")
        .execute(pool)
        .await?;

    Ok(())
}
