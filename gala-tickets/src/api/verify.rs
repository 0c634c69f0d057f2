//! Ticket verification endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::services::{verify_ticket, VerifyResponse};
use crate::AppState;

/// GET /verify/:code
pub async fn verify_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<VerifyResponse> {
    Json(verify_ticket(state.store.as_ref(), &code).await)
}

/// POST /verify
///
/// Body `{"code": "GAL-12345"}`. A missing, empty or non-string code is a
/// 400 with `valid: false`.
pub async fn verify_posted(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<VerifyResponse>) {
    match posted_code(&body) {
        Some(code) => (
            StatusCode::OK,
            Json(verify_ticket(state.store.as_ref(), &code).await),
        ),
        None => (StatusCode::BAD_REQUEST, Json(VerifyResponse::missing_code())),
    }
}

fn posted_code(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("code")
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

/// Build verification routes
pub fn verify_routes() -> Router<AppState> {
    Router::new()
        .route("/verify/:code", get(verify_code))
        .route("/verify", post(verify_posted))
}
