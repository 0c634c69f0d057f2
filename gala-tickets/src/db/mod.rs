//! Ticket store
//!
//! The pipeline only sees the [`TicketStore`] trait; the service wires in
//! [`SqliteTicketStore`]. `clear` and `batch_insert` are deliberately separate
//! calls: the batch coordinator sequences them, and a failure between the two
//! leaves the store empty.

pub mod tickets;

pub use tickets::SqliteTicketStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gala_common::Result;
use serde::Serialize;

use crate::services::code_generator::TicketCode;

/// Persisted ticket
///
/// `code` is kept as the raw stored string: rows are not re-validated on
/// read, so a malformed code surfaces when something tries to render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    /// Store-assigned identifier
    pub id: String,
    pub code: String,
    /// Write-time timestamp
    pub issued_at: DateTime<Utc>,
    /// ISO-8601 rendering of the issue time as originally written
    pub created_at: String,
}

/// Durable record of issued codes
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Delete every record; returns how many were removed
    async fn clear(&self) -> Result<u64>;

    /// Insert one record per code in a single atomic write
    ///
    /// The issue timestamp is assigned by the store at write time.
    async fn batch_insert(&self, codes: &[TicketCode]) -> Result<Vec<TicketRecord>>;

    /// All records, newest first
    async fn list_all(&self) -> Result<Vec<TicketRecord>>;

    /// First record with exactly this code, if any
    async fn find_by_code(&self, code: &str) -> Result<Option<TicketRecord>>;
}

/// Pick the issue date of a stored row
///
/// Uses `issued_at` when it parses, then `created_at`, then `fallback`.
pub fn resolve_issue_date(
    issued_at: Option<&str>,
    created_at: Option<&str>,
    fallback: DateTime<Utc>,
) -> DateTime<Utc> {
    issued_at
        .and_then(gala_common::time::parse_iso8601)
        .or_else(|| created_at.and_then(gala_common::time::parse_iso8601))
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_resolve_prefers_issued_at() {
        let fallback = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let resolved = resolve_issue_date(
            Some("2026-10-18T10:00:00.000Z"),
            Some("2026-10-17T10:00:00.000Z"),
            fallback,
        );
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_falls_back_to_created_at() {
        let fallback = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let resolved = resolve_issue_date(Some("garbage"), Some("2026-10-17T10:00:00Z"), fallback);
        assert_eq!(resolved, Utc.with_ymd_and_hms(2026, 10, 17, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_resolve_uses_fallback_last() {
        let fallback = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(resolve_issue_date(None, None, fallback), fallback);
        assert_eq!(resolve_issue_date(Some(""), Some("nope"), fallback), fallback);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = TicketRecord {
            id: "abc".to_string(),
            code: "GAL-12345".to_string(),
            issued_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["issuedAt"], "2026-01-01T00:00:00Z");
        assert_eq!(json["createdAt"], "2026-01-01T00:00:00.000Z");
    }
}
