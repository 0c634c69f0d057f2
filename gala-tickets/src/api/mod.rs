//! HTTP API handlers for gala-tickets
//!
//! JSON and binary endpoints for issuance, download and verification, plus
//! the HTML pages of the web interface.

pub mod download;
pub mod health;
pub mod tickets;
pub mod ui;
pub mod verify;

pub use download::download_routes;
pub use health::health_routes;
pub use tickets::ticket_routes;
pub use ui::ui_routes;
pub use verify::verify_routes;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};

use crate::services::{ArchiveStream, TicketArtifact};

/// Header set to `false` when issued tickets could not be saved
pub const PERSISTED_HEADER: &str = "x-tickets-persisted";

/// PNG download response for one artifact
pub(crate) fn png_attachment(artifact: TicketArtifact) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name());
    (
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.png,
    )
        .into_response()
}

/// ZIP download response backed by a streaming archive
pub(crate) fn zip_attachment(file_name: &str, stream: ArchiveStream) -> Response {
    let disposition = format!("attachment; filename=\"{file_name}\"");
    (
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Mark a response as carrying tickets that were not saved
pub(crate) fn mark_unpersisted(response: &mut Response) {
    response
        .headers_mut()
        .insert(HeaderName::from_static(PERSISTED_HEADER), HeaderValue::from_static("false"));
}

/// Which banner the listing page shows after a redirect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notice {
    Success,
    Error,
}

/// Redirect to the listing page with a banner message
pub(crate) fn redirect_home(notice: Notice, message: &str) -> Redirect {
    let key = match notice {
        Notice::Success => "success",
        Notice::Error => "error",
    };
    let query = serde_urlencoded::to_string([(key, message)]).unwrap_or_default();
    Redirect::to(&format!("/?{query}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_redirect_home_encodes_message() {
        let response = redirect_home(Notice::Error, "No tickets to download").into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/?error=No+tickets+to+download"
        );
    }
}
