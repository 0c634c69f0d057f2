//! Listing page and the batch form behind it

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::{error, info};

use super::{escape_html, render_page};
use crate::api::{redirect_home, Notice};
use crate::db::TicketRecord;
use crate::error::TicketError;
use crate::services::{list_tickets, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::AppState;

/// Banner messages carried through the redirect after a form post
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// `POST /generate` form body
#[derive(Debug, Default, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub count: Option<String>,
}

/// Interpret the form's `count` field
///
/// Reads a leading integer the way a lenient form parser would: surrounding
/// text is ignored, and a missing, unreadable or zero value means one
/// ticket. Other values are returned as is for range checking.
pub fn requested_count(raw: Option<&str>) -> i64 {
    match raw.and_then(leading_integer) {
        None | Some(0) => 1,
        Some(n) => n,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// GET /
pub async fn listing_page(
    State(state): State<AppState>,
    Query(notice): Query<NoticeQuery>,
) -> Html<String> {
    let tickets = list_tickets(state.store.as_ref()).await;

    let mut banners = String::new();
    if let Some(message) = notice.success.as_deref().filter(|m| !m.is_empty()) {
        banners.push_str(&format!(
            "        <div class=\"notice success\">{}</div>\n",
            escape_html(message)
        ));
    }
    if let Some(message) = notice.error.as_deref().filter(|m| !m.is_empty()) {
        banners.push_str(&format!(
            "        <div class=\"notice error\">{}</div>\n",
            escape_html(message)
        ));
    }
    if !state.pipeline.template().is_present() {
        banners.push_str(&format!(
            "        <div class=\"notice error\">Ticket template missing: {}</div>\n",
            escape_html(&state.pipeline.template().path().display().to_string())
        ));
    }

    let content = format!(
        r#"{banners}        <div class="card">
            <h2>Issue tickets</h2>
            <p>Issuing a new batch replaces every existing ticket.</p>
            <form method="post" action="/generate">
                <input type="number" name="count" min="{min}" max="{max}" value="1">
                <button type="submit">Generate</button>
            </form>
        </div>
        <div class="card">
            <h2>Tickets ({count})</h2>
            <p><a class="button secondary" href="/download-all">Download all</a></p>
{table}
        </div>"#,
        min = MIN_BATCH_SIZE,
        max = MAX_BATCH_SIZE,
        count = tickets.len(),
        table = ticket_table(&tickets),
    );

    Html(render_page("Tickets", &content, ""))
}

fn ticket_table(tickets: &[TicketRecord]) -> String {
    if tickets.is_empty() {
        return "            <p class=\"empty\">No tickets issued yet</p>".to_string();
    }

    let rows: String = tickets
        .iter()
        .map(|ticket| {
            let code = escape_html(&ticket.code);
            format!(
                "                <tr><td class=\"code\">{code}</td><td>{date}</td>\
                 <td><a href=\"/download/{code}\">Download</a> · \
                 <a href=\"/verify/{code}\">Verify</a></td></tr>\n",
                date = ticket.issued_at.format("%Y-%m-%d %H:%M:%S UTC"),
            )
        })
        .collect();

    format!(
        "            <table>\n                <tr><th>Code</th><th>Issued</th><th></th></tr>\n{rows}            </table>"
    )
}

/// POST /generate
///
/// Same issuance as the API, but answers with a redirect to the listing and
/// never delivers the tickets themselves.
pub async fn generate_from_form(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Redirect {
    let n = requested_count(form.count.as_deref());

    match state.coordinator.issue_batch(n).await {
        Ok(outcome) => match outcome.persist_error {
            None => {
                info!("Issued {} ticket(s) from web form", outcome.artifacts.len());
                redirect_home(
                    Notice::Success,
                    &format!(
                        "{} ticket(s) generated. You can now download them individually or all at once.",
                        outcome.artifacts.len()
                    ),
                )
            }
            Some(e) => redirect_home(
                Notice::Error,
                &format!(
                    "{} ticket(s) generated but could not be saved: {}",
                    outcome.artifacts.len(),
                    e
                ),
            ),
        },
        Err(e) => {
            error!("Web form issuance failed: {}", e);
            redirect_home(Notice::Error, &form_error_message(&e))
        }
    }
}

fn form_error_message(err: &TicketError) -> String {
    match err {
        TicketError::Validation(_) => format!(
            "Count must be between {} and {}",
            MIN_BATCH_SIZE, MAX_BATCH_SIZE
        ),
        TicketError::TemplateMissing(_) => "Ticket template not found".to_string(),
        TicketError::Store(_) => "Failed to delete existing ticket data".to_string(),
        other => other.to_string(),
    }
}
