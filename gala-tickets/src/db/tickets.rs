//! SQLite ticket store

use async_trait::async_trait;
use chrono::SubsecRound;
use gala_common::time::{now, to_iso8601};
use gala_common::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{resolve_issue_date, TicketRecord, TicketStore};
use crate::services::code_generator::TicketCode;

type TicketRow = (String, String, Option<String>, Option<String>);

/// [`TicketStore`] backed by the `tickets` table
#[derive(Debug, Clone)]
pub struct SqliteTicketStore {
    pool: SqlitePool,
}

impl SqliteTicketStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn into_record((id, code, issued_at, created_at): TicketRow) -> TicketRecord {
        let issued = resolve_issue_date(issued_at.as_deref(), created_at.as_deref(), now());
        TicketRecord {
            id,
            code,
            issued_at: issued,
            created_at: created_at.unwrap_or_else(|| to_iso8601(&issued)),
        }
    }
}

#[async_trait]
impl TicketStore for SqliteTicketStore {
    async fn clear(&self) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM tickets")
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            info!("Ticket store already empty");
        } else {
            info!("Deleted {} ticket record(s)", deleted);
        }
        Ok(deleted)
    }

    async fn batch_insert(&self, codes: &[TicketCode]) -> Result<Vec<TicketRecord>> {
        // Stored text has millisecond precision; keep the returned records equal to it
        let issued_at = now().trunc_subsecs(3);
        let stamp = to_iso8601(&issued_at);

        let mut tx = self.pool.begin().await?;
        let mut records = Vec::with_capacity(codes.len());

        for code in codes {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO tickets (id, code, issued_at, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(code.as_str())
            .bind(&stamp)
            .bind(&stamp)
            .execute(&mut *tx)
            .await?;

            records.push(TicketRecord {
                id,
                code: code.to_string(),
                issued_at,
                created_at: stamp.clone(),
            });
        }

        tx.commit().await?;
        info!("Saved {} ticket(s) to store", records.len());
        Ok(records)
    }

    async fn list_all(&self) -> Result<Vec<TicketRecord>> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            "SELECT id, code, issued_at, created_at FROM tickets ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut records: Vec<TicketRecord> = rows.into_iter().map(Self::into_record).collect();
        // Stable sort keeps insertion order among tickets of the same batch
        records.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        debug!(count = records.len(), "Listed tickets");
        Ok(records)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<TicketRecord>> {
        let row: Option<TicketRow> = sqlx::query_as(
            "SELECT id, code, issued_at, created_at FROM tickets WHERE code = ? ORDER BY rowid LIMIT 1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Self::into_record))
    }
}
