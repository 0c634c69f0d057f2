//! UI Routes - HTML pages for the gala-tickets web interface
//!
//! # Structure
//! - **Listing** (`listing`): ticket table, batch form and download links
//! - **Scan** (`scan`): code verification page for door staff
//! - **Static Assets** (`static_assets`): CSS/JS file serving

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

mod listing;
mod scan;
mod static_assets;

pub use listing::requested_count;

use listing::{generate_from_form, listing_page};
use scan::scan_page;
use static_assets::{serve_gala_css, serve_scan_js};

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        // Page routes
        .route("/", get(listing_page))
        .route("/generate", post(generate_from_form))
        .route("/scan", get(scan_page))
        // Static assets
        .route("/static/gala.css", get(serve_gala_css))
        .route("/static/scan.js", get(serve_scan_js))
}

/// Escape text for HTML element and attribute content
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wrap page content in the shared layout
fn render_page(title: &str, content: &str, scripts: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Gala Tickets</title>
    <link rel="stylesheet" href="/static/gala.css">
</head>
<body>
    <header>
        <div class="header-content">
            <div>
                <h1>Gala Tickets</h1>
                <nav><a href="/">Tickets</a><a href="/scan">Scan</a></nav>
            </div>
            <div class="build-info-line">v{version} [{git_hash}]<br>{build_timestamp}</div>
        </div>
    </header>
    <div class="container">
{content}
    </div>
{scripts}
</body>
</html>
"#,
        title = escape_html(title),
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("GIT_HASH"),
        build_timestamp = env!("BUILD_TIMESTAMP"),
    )
}
