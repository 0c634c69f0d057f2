//! Static asset handlers for the gala-tickets UI
//!
//! Embeds and serves CSS/JS files at compile time

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const GALA_CSS: &str = include_str!("../../../static/gala.css");
const SCAN_JS: &str = include_str!("../../../static/scan.js");

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

/// GET /static/gala.css
pub async fn serve_gala_css() -> Response {
    asset("text/css", GALA_CSS)
}

/// GET /static/scan.js
pub async fn serve_scan_js() -> Response {
    asset("application/javascript", SCAN_JS)
}
