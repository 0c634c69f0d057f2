//! Batch issuance
//!
//! Issuing a batch replaces the whole ticket collection:
//! 1. Validate the batch size
//! 2. Check the template exists (nothing is touched if it does not)
//! 3. Clear every existing record
//! 4. Render all tickets in memory, in parallel
//! 5. Persist the new codes in one atomic write
//!
//! Steps 3 and 5 are separate store calls. A failure in 4 or 5 leaves the
//! store empty or stale; this is logged rather than rolled back. A failed
//! write in step 5 does not discard the rendered tickets: the caller still
//! gets them, along with the persistence error.

use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::db::{TicketRecord, TicketStore};
use crate::error::{TicketError, TicketResult};
use crate::services::code_generator::TicketCode;
use crate::services::ticket_pipeline::{TicketArtifact, TicketPipeline};

/// Smallest accepted batch
pub const MIN_BATCH_SIZE: i64 = 1;

/// Largest accepted batch
pub const MAX_BATCH_SIZE: i64 = 100;

/// Check a requested batch size
pub fn validate_batch_size(n: i64) -> TicketResult<usize> {
    if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&n) {
        return Err(TicketError::Validation(format!(
            "n must be an integer between {} and {}",
            MIN_BATCH_SIZE, MAX_BATCH_SIZE
        )));
    }
    Ok(n as usize)
}

/// Result of a batch whose tickets were all rendered
#[derive(Debug)]
pub struct BatchOutcome {
    /// Rendered tickets, in issue order
    pub artifacts: Vec<TicketArtifact>,
    /// Stored records; empty when persistence failed
    pub records: Vec<TicketRecord>,
    /// Set when the batch write failed after rendering succeeded
    pub persist_error: Option<TicketError>,
}

impl BatchOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn codes(&self) -> Vec<TicketCode> {
        self.artifacts.iter().map(|a| a.code.clone()).collect()
    }
}

/// Sequences store and pipeline for a batch; holds no per-batch state
#[derive(Clone)]
pub struct BatchCoordinator {
    store: Arc<dyn TicketStore>,
    pipeline: Arc<TicketPipeline>,
}

impl BatchCoordinator {
    pub fn new(store: Arc<dyn TicketStore>, pipeline: Arc<TicketPipeline>) -> Self {
        Self { store, pipeline }
    }

    /// Issue `n` tickets, replacing all stored records
    ///
    /// **Errors:**
    /// - [`TicketError::Validation`] if `n` is outside 1..=100 (store untouched)
    /// - [`TicketError::TemplateMissing`] if the template is absent (store untouched)
    /// - [`TicketError::Store`] if clearing the store fails
    /// - any rendering error, which aborts the whole batch after the store was cleared
    pub async fn issue_batch(&self, n: i64) -> TicketResult<BatchOutcome> {
        let count = validate_batch_size(n)?;

        self.pipeline.template().ensure_present().map_err(|e| {
            warn!("Batch of {} refused: {}", count, e);
            e
        })?;

        self.store.clear().await.map_err(|e| {
            error!("Failed to delete existing ticket data: {}", e);
            TicketError::Store(e)
        })?;

        let started = Instant::now();
        let pipeline = Arc::clone(&self.pipeline);
        let rendered = tokio::task::spawn_blocking(move || render_batch(&pipeline, count)).await;

        let artifacts = match rendered {
            Ok(Ok(artifacts)) => artifacts,
            Ok(Err(e)) => {
                error!(
                    "Batch of {} aborted: {}; ticket store was cleared and is now empty",
                    count, e
                );
                return Err(e);
            }
            Err(join_err) => {
                error!(
                    "Batch worker failed: {}; ticket store was cleared and is now empty",
                    join_err
                );
                return Err(join_err.into());
            }
        };

        info!(
            "Rendered {} ticket(s) in {:?}",
            artifacts.len(),
            started.elapsed()
        );

        let codes: Vec<TicketCode> = artifacts.iter().map(|a| a.code.clone()).collect();
        let (records, persist_error) = match self.store.batch_insert(&codes).await {
            Ok(records) => (records, None),
            Err(e) => {
                error!(
                    "Failed to save {} ticket(s): {}; delivering them anyway, store no longer matches issued tickets",
                    codes.len(),
                    e
                );
                (Vec::new(), Some(TicketError::Store(e)))
            }
        };

        Ok(BatchOutcome {
            artifacts,
            records,
            persist_error,
        })
    }
}

/// Render `count` new tickets across the rayon pool; first error wins
fn render_batch(pipeline: &TicketPipeline, count: usize) -> TicketResult<Vec<TicketArtifact>> {
    (0..count)
        .into_par_iter()
        .map(|_| pipeline.issue_new())
        .collect()
}
