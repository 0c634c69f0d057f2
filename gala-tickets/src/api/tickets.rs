//! Ticket issuance endpoints
//!
//! `POST /generate-tickets` answers with the ticket itself for a batch of
//! one and with a ZIP archive otherwise. Tickets that could not be saved are
//! still delivered, flagged with the `X-Tickets-Persisted: false` header.

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tracing::{info, warn};

use super::{mark_unpersisted, png_attachment, zip_attachment};
use crate::error::{ApiError, ApiResult, TicketError};
use crate::services::{stream_archive, ArchiveEntry, BatchOutcome, ARCHIVE_FILE_NAME};
use crate::AppState;

/// Batch size used when the request does not name one
pub const DEFAULT_BATCH_SIZE: i64 = 1;

const BATCH_SIZE_MESSAGE: &str = "n must be an integer between 1 and 100";

/// Read `n` from a `/generate-tickets` request body
///
/// An empty body or a JSON object without `n` means one ticket. `n` must be
/// an integral JSON number (`2.0` counts as 2); range checking happens in
/// the batch coordinator.
pub fn requested_batch_size(body: &[u8]) -> Result<i64, TicketError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(DEFAULT_BATCH_SIZE);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| TicketError::Validation(format!("Invalid JSON body: {e}")))?;

    let n = match value.get("n") {
        None => return Ok(DEFAULT_BATCH_SIZE),
        Some(n) => n,
    };

    if let Some(n) = n.as_i64() {
        return Ok(n);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(TicketError::Validation(BATCH_SIZE_MESSAGE.to_string())),
    }
}

/// POST /generate-tickets
///
/// **Errors:**
/// - 400 if `n` is missing a valid integer value or is outside 1..=100
/// - 404 if the ticket template is missing
/// - 500 if the store could not be cleared or a ticket failed to render
pub async fn generate_tickets(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let n = requested_batch_size(&body)?;
    let outcome = state.coordinator.issue_batch(n).await?;
    Ok(deliver(outcome))
}

/// GET /generate-ticket
///
/// Issues a batch of one and returns its PNG.
pub async fn generate_ticket(State(state): State<AppState>) -> ApiResult<Response> {
    let outcome = state.coordinator.issue_batch(DEFAULT_BATCH_SIZE).await?;
    Ok(deliver(outcome))
}

fn deliver(outcome: BatchOutcome) -> Response {
    let persisted = outcome.is_persisted();
    if let Some(e) = &outcome.persist_error {
        warn!("Delivering {} unsaved ticket(s): {}", outcome.artifacts.len(), e);
    }

    let mut artifacts = outcome.artifacts;
    let mut response = if artifacts.len() == 1 {
        match artifacts.pop() {
            Some(artifact) => {
                info!(code = %artifact.code, "Issued single ticket");
                png_attachment(artifact)
            }
            None => ApiError::Internal("Batch produced no tickets".to_string()).into_response(),
        }
    } else {
        info!("Issued {} tickets as archive", artifacts.len());
        let entries: Vec<_> = artifacts.into_iter().map(|a| Ok(ArchiveEntry::from(a))).collect();
        zip_attachment(ARCHIVE_FILE_NAME, stream_archive(entries))
    };

    if !persisted {
        mark_unpersisted(&mut response);
    }
    response
}

/// Build ticket issuance routes
pub fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-tickets", post(generate_tickets))
        .route("/generate-ticket", get(generate_ticket))
}
