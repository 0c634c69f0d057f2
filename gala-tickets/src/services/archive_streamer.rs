//! Streaming ZIP archives of ticket artifacts
//!
//! Entries are compressed and written one at a time on a blocking thread.
//! Output leaves in chunks through a bounded channel that backs the HTTP
//! response body, so the container never sits fully in memory and the client
//! sees bytes as soon as the first entry is done. The central directory is
//! written after the last entry.
//!
//! Entry sources yield `Result`s: a failed entry is skipped and counted, and
//! the archive is still finalized with the rest. A write failure (usually the
//! client going away) aborts the archive.

use std::io::{self, Write};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::TicketResult;
use crate::services::code_generator::TicketCode;
use crate::services::ticket_pipeline::{artifact_file_name, TicketArtifact, TicketPipeline};

/// Download name for multi-ticket archives
pub const ARCHIVE_FILE_NAME: &str = "all_tickets.zip";

/// Deflate level (maximum)
const COMPRESSION_LEVEL: i64 = 9;

/// Bytes buffered before a chunk is handed to the response body
const CHUNK_SIZE: usize = 64 * 1024;

/// Chunks in flight between the writer thread and the response
const CHANNEL_CAPACITY: usize = 8;

/// One archive member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl From<TicketArtifact> for ArchiveEntry {
    fn from(artifact: TicketArtifact) -> Self {
        Self {
            name: artifact.file_name(),
            bytes: artifact.png,
        }
    }
}

/// Entry counts of a finished archive
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Byte stream of an archive being written
pub type ArchiveStream = ReceiverStream<io::Result<Vec<u8>>>;

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
}

/// Write a ZIP containing `entries` to `writer`
///
/// `writer` only needs `Write`; the archive is produced front to back
/// without seeking.
pub fn write_archive<W, I>(writer: W, entries: I) -> TicketResult<ArchiveSummary>
where
    W: Write,
    I: IntoIterator<Item = TicketResult<ArchiveEntry>>,
{
    let mut zip = ZipWriter::new_stream(writer);
    let mut summary = ArchiveSummary::default();

    for entry in entries {
        match entry {
            Ok(ArchiveEntry { name, bytes }) => {
                debug!(name = %name, size = bytes.len(), "Appending archive entry");
                zip.start_file(name, entry_options())?;
                zip.write_all(&bytes).map_err(ZipError::from)?;
                summary.written += 1;
            }
            Err(e) => {
                debug!("Archive entry skipped: {}", e);
                summary.skipped += 1;
            }
        }
    }

    let mut inner = zip.finish()?;
    inner.flush().map_err(ZipError::from)?;
    Ok(summary)
}

/// Start writing an archive in the background and return its byte stream
///
/// Must be called from within a Tokio runtime. The entry iterator is driven
/// on the blocking pool, so it may do CPU-heavy work such as rendering.
pub fn stream_archive<I>(entries: I) -> ArchiveStream
where
    I: IntoIterator<Item = TicketResult<ArchiveEntry>> + Send + 'static,
    I::IntoIter: Send,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let error_tx = tx.clone();

    tokio::task::spawn_blocking(move || {
        match write_archive(ChannelWriter::new(tx), entries) {
            Ok(summary) => {
                info!(
                    "Archive finalized: {} entr(ies) written, {} skipped",
                    summary.written, summary.skipped
                );
            }
            Err(e) => {
                error!("Archive aborted: {}", e);
                let _ = error_tx.blocking_send(Err(io::Error::other(e.to_string())));
            }
        }
    });

    ReceiverStream::new(rx)
}

/// Lazily regenerate stored codes as archive entries
///
/// Each failure (malformed stored code, rendering error) is logged with the
/// code and yielded as an `Err`, which [`write_archive`] skips.
pub fn regenerated_entries(
    pipeline: Arc<TicketPipeline>,
    codes: Vec<String>,
) -> impl Iterator<Item = TicketResult<ArchiveEntry>> + Send + 'static {
    codes.into_iter().map(move |raw| {
        TicketCode::parse(&raw)
            .and_then(|code| pipeline.regenerate(&code))
            .map(ArchiveEntry::from)
            .map_err(|e| {
                warn!(code = %raw, "Error adding {} to archive: {}", artifact_file_name(&raw), e);
                e
            })
    })
}

/// `Write` adapter feeding an mpsc channel in fixed-size chunks
struct ChannelWriter {
    tx: mpsc::Sender<io::Result<Vec<u8>>>,
    buffer: Vec<u8>,
}

impl ChannelWriter {
    fn new(tx: mpsc::Sender<io::Result<Vec<u8>>>) -> Self {
        Self {
            tx,
            buffer: Vec::with_capacity(CHUNK_SIZE),
        }
    }

    fn send_buffer(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let chunk = std::mem::replace(&mut self.buffer, Vec::with_capacity(CHUNK_SIZE));
        self.tx
            .blocking_send(Ok(chunk))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "archive receiver closed"))
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        if self.buffer.len() >= CHUNK_SIZE {
            self.send_buffer()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_buffer()
    }
}
