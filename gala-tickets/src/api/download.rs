//! Ticket download endpoints
//!
//! Artifacts are never stored; both endpoints regenerate them from codes.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{error, info};

use super::{png_attachment, redirect_home, zip_attachment, Notice};
use crate::error::{ApiError, ApiResult, TicketError};
use crate::services::{
    list_tickets, regenerated_entries, stream_archive, TicketCode, ARCHIVE_FILE_NAME,
};
use crate::AppState;

pub const NO_TICKETS_MESSAGE: &str = "No tickets to download";

/// GET /download/:code
///
/// Does not consult the store: any well-formed code renders.
///
/// **Errors:**
/// - 400 if `code` is not a ticket code
/// - 500 if the ticket could not be rendered (including a missing template)
pub async fn download_ticket(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Response> {
    let code = TicketCode::parse(&code)?;

    let pipeline = Arc::clone(&state.pipeline);
    let rendered = tokio::task::spawn_blocking(move || pipeline.regenerate(&code))
        .await
        .map_err(TicketError::from)
        .and_then(|result| result);

    match rendered {
        Ok(artifact) => {
            info!(code = %artifact.code, "Regenerated ticket for download");
            Ok(png_attachment(artifact))
        }
        Err(e) => {
            error!("Error downloading ticket: {}", e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

/// GET /download-all
///
/// Streams every stored ticket as one archive. Tickets that fail to render
/// are left out; an empty store redirects back to the listing.
pub async fn download_all(State(state): State<AppState>) -> Response {
    let records = list_tickets(state.store.as_ref()).await;
    if records.is_empty() {
        return redirect_home(Notice::Error, NO_TICKETS_MESSAGE).into_response();
    }

    info!("Streaming archive of {} stored ticket(s)", records.len());
    let codes: Vec<String> = records.into_iter().map(|r| r.code).collect();
    let entries = regenerated_entries(Arc::clone(&state.pipeline), codes);
    zip_attachment(ARCHIVE_FILE_NAME, stream_archive(entries))
}

/// Build download routes
pub fn download_routes() -> Router<AppState> {
    Router::new()
        .route("/download/:code", get(download_ticket))
        .route("/download-all", get(download_all))
}
