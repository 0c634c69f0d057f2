//! Ticket artifact pipeline and the services built on it
//!
//! Leaf-first: code generation, QR encoding, template loading and
//! compositing feed [`TicketPipeline`]; batch issuance, archive streaming and
//! verification sit on top of the pipeline and the ticket store.

pub mod archive_streamer;
pub mod batch_coordinator;
pub mod code_generator;
pub mod compositor;
pub mod qr_encoder;
pub mod template;
pub mod ticket_pipeline;
pub mod verifier;

pub use archive_streamer::{
    regenerated_entries, stream_archive, write_archive, ArchiveEntry, ArchiveStream,
    ArchiveSummary, ARCHIVE_FILE_NAME,
};
pub use batch_coordinator::{
    validate_batch_size, BatchCoordinator, BatchOutcome, MAX_BATCH_SIZE, MIN_BATCH_SIZE,
};
pub use code_generator::TicketCode;
pub use compositor::Compositor;
pub use qr_encoder::{QrEncoder, QrOptions};
pub use template::TicketTemplate;
pub use ticket_pipeline::{artifact_file_name, TicketArtifact, TicketPipeline};
pub use verifier::{list_tickets, verify_ticket, VerifyResponse};
