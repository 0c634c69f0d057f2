//! Scan page handler

use axum::response::Html;

use super::render_page;

/// GET /scan
///
/// Codes typed or sent by a keyboard-wedge scanner are checked against
/// `POST /verify` by `scan.js`.
pub async fn scan_page() -> Html<String> {
    let content = r#"        <div class="card">
            <h2>Verify a ticket</h2>
            <form id="scan-form">
                <input type="text" id="code" name="code" placeholder="GAL-12345" autocomplete="off">
                <button type="submit">Verify</button>
            </form>
            <div id="result"></div>
        </div>"#;

    Html(render_page(
        "Scan",
        content,
        r#"    <script src="/static/scan.js"></script>"#,
    ))
}
