//! Ticket artifact pipeline
//!
//! Code → QR raster → composite onto template → PNG bytes.
//!
//! Rendering is a pure function of the code and the template file, which is
//! what lets downloads regenerate an artifact instead of storing it. Nothing
//! here caches rendered output.

use image::{DynamicImage, RgbaImage};
use rand::Rng;
use std::path::PathBuf;

use crate::error::TicketResult;
use crate::services::code_generator::{self, TicketCode};
use crate::services::compositor::{encode_png, Compositor};
use crate::services::qr_encoder::QrEncoder;
use crate::services::template::TicketTemplate;

/// File name used for an artifact in downloads and archives
pub fn artifact_file_name(code: &str) -> String {
    format!("ticket_{code}.png")
}

/// Rendered ticket, held in memory until delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketArtifact {
    pub code: TicketCode,
    /// PNG-encoded image
    pub png: Vec<u8>,
}

impl TicketArtifact {
    pub fn file_name(&self) -> String {
        artifact_file_name(self.code.as_str())
    }
}

/// Produces ticket artifacts from a template
#[derive(Debug, Clone)]
pub struct TicketPipeline {
    template: TicketTemplate,
    encoder: QrEncoder,
    compositor: Compositor,
}

impl TicketPipeline {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template: TicketTemplate::new(template_path),
            encoder: QrEncoder::default(),
            compositor: Compositor::default(),
        }
    }

    pub fn with_encoder(mut self, encoder: QrEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_compositor(mut self, compositor: Compositor) -> Self {
        self.compositor = compositor;
        self
    }

    pub fn template(&self) -> &TicketTemplate {
        &self.template
    }

    /// Draw a new code and render its artifact
    pub fn issue_new(&self) -> TicketResult<TicketArtifact> {
        self.regenerate(&code_generator::generate())
    }

    /// Same as [`issue_new`](Self::issue_new) with a caller-supplied RNG
    pub fn issue_new_with<R: Rng + ?Sized>(&self, rng: &mut R) -> TicketResult<TicketArtifact> {
        self.regenerate(&code_generator::generate_with(rng))
    }

    /// Render the artifact for an existing code
    ///
    /// Errors from the encoder, template or compositor are returned as is.
    pub fn regenerate(&self, code: &TicketCode) -> TicketResult<TicketArtifact> {
        let qr = self.encoder.encode(code.as_str())?;
        let overlay: RgbaImage = DynamicImage::ImageLuma8(qr).to_rgba8();

        let background = self.template.load()?;
        let composed = self.compositor.composite(&background, &overlay)?;
        let png = encode_png(&composed)?;

        Ok(TicketArtifact {
            code: code.clone(),
            png,
        })
    }
}
