//! Ticket verification and listing
//!
//! Read-side operations never fail outward: a store error turns a
//! verification into `valid: false` and a listing into an empty list.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

use crate::db::{TicketRecord, TicketStore};

pub const MSG_VALID: &str = "Ticket valid";
pub const MSG_NOT_FOUND: &str = "Ticket not found";
pub const MSG_CODE_REQUIRED: &str = "Ticket code required";

/// Verification answer, serialized as the `/verify` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub message: String,
}

impl VerifyResponse {
    fn found(code: &str, record: TicketRecord) -> Self {
        Self {
            valid: true,
            code: Some(code.to_string()),
            id: Some(record.id),
            date: Some(record.issued_at),
            created_at: Some(record.created_at),
            message: MSG_VALID.to_string(),
        }
    }

    fn rejected(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            code: code.map(str::to_string),
            id: None,
            date: None,
            created_at: None,
            message: message.into(),
        }
    }

    /// Answer for a request that carried no code
    pub fn missing_code() -> Self {
        Self::rejected(None, MSG_CODE_REQUIRED)
    }
}

/// Look up `code` exactly as given
pub async fn verify_ticket(store: &dyn TicketStore, code: &str) -> VerifyResponse {
    match store.find_by_code(code).await {
        Ok(Some(record)) => {
            debug!(code = %code, id = %record.id, "Ticket verified");
            VerifyResponse::found(code, record)
        }
        Ok(None) => {
            debug!(code = %code, "Ticket not found");
            VerifyResponse::rejected(Some(code), MSG_NOT_FOUND)
        }
        Err(e) => {
            error!(code = %code, "Error verifying ticket code: {}", e);
            VerifyResponse::rejected(Some(code), format!("Verification failed: {e}"))
        }
    }
}

/// All stored tickets, newest first; empty if the store cannot be read
pub async fn list_tickets(store: &dyn TicketStore) -> Vec<TicketRecord> {
    store.list_all().await.unwrap_or_else(|e| {
        error!("Error listing tickets: {}", e);
        Vec::new()
    })
}
