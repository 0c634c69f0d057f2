//! Error types for gala-tickets
//!
//! [`TicketError`] is the pipeline's failure taxonomy. [`ApiError`] is what
//! HTTP handlers return; it renders as a JSON error body with a status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a ticket pipeline operation
#[derive(Debug, Error)]
pub enum TicketError {
    /// User-correctable input problem (bad batch size, malformed code)
    #[error("{0}")]
    Validation(String),

    /// Background template file is absent
    #[error("Ticket template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// QR symbol could not be built for the payload
    #[error("QR encoding failed: {0}")]
    Encoding(String),

    /// Template unreadable or undecodable, overlay does not fit, or PNG output failed
    #[error("Compositing failed: {0}")]
    Compositing(String),

    /// Ticket store read or write failed
    #[error(transparent)]
    Store(#[from] gala_common::Error),

    /// ZIP container could not be written
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Blocking worker panicked or was cancelled
    #[error("Worker task failed: {0}")]
    TaskFailed(String),
}

impl TicketError {
    /// True for errors the requester can fix by changing the request
    pub fn is_validation(&self) -> bool {
        matches!(self, TicketError::Validation(_))
    }
}

impl From<tokio::task::JoinError> for TicketError {
    fn from(err: tokio::task::JoinError) -> Self {
        TicketError::TaskFailed(err.to_string())
    }
}

/// Result alias for pipeline operations
pub type TicketResult<T> = Result<T, TicketError>;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<TicketError> for ApiError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::Validation(msg) => ApiError::BadRequest(msg),
            TicketError::TemplateMissing(_) => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
