//! gala-tickets library interface
//!
//! Exposes the ticket pipeline, the store and the HTTP router for the binary
//! and for integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult, TicketError, TicketResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::db::TicketStore;
use crate::services::{BatchCoordinator, TicketPipeline};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Durable record of issued codes
    pub store: Arc<dyn TicketStore>,
    /// Renders and regenerates ticket artifacts
    pub pipeline: Arc<TicketPipeline>,
    /// Batch issuance over `store` and `pipeline`
    pub coordinator: BatchCoordinator,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<dyn TicketStore>, pipeline: TicketPipeline) -> Self {
        let pipeline = Arc::new(pipeline);
        Self {
            coordinator: BatchCoordinator::new(Arc::clone(&store), Arc::clone(&pipeline)),
            store,
            pipeline,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages and form posts)
        .merge(api::ui_routes())
        // API routes
        .merge(api::ticket_routes())
        .merge(api::download_routes())
        .merge(api::verify_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
