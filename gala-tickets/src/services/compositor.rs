//! Overlay compositing
//!
//! Places the QR raster on the template: inset from the right edge and
//! vertically centred. The overlay replaces the pixels it covers (no alpha
//! blending); its own alpha channel is carried into the output unchanged.

use image::{imageops, ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::error::{TicketError, TicketResult};

/// Default gap between the overlay's right edge and the background's right edge
pub const DEFAULT_RIGHT_INSET: u32 = 150;

/// Compositor
#[derive(Debug, Clone)]
pub struct Compositor {
    right_inset: u32,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            right_inset: DEFAULT_RIGHT_INSET,
        }
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_right_inset(mut self, right_inset: u32) -> Self {
        self.right_inset = right_inset;
        self
    }

    /// Top-left corner of the overlay for the given dimensions
    ///
    /// `x = round(bw - ow - inset)`, `y = round((bh - oh) / 2)`, each clamped
    /// at zero.
    pub fn overlay_position(&self, background: (u32, u32), overlay: (u32, u32)) -> (u32, u32) {
        let (bw, bh) = (background.0 as f64, background.1 as f64);
        let (ow, oh) = (overlay.0 as f64, overlay.1 as f64);

        let x = (bw - ow - self.right_inset as f64).round();
        let y = ((bh - oh) / 2.0).round();

        (x.max(0.0) as u32, y.max(0.0) as u32)
    }

    /// Paste `overlay` onto a copy of `background`
    ///
    /// **Errors:** [`TicketError::Compositing`] if the overlay is wider or
    /// taller than the background.
    pub fn composite(&self, background: &RgbaImage, overlay: &RgbaImage) -> TicketResult<RgbaImage> {
        let (bw, bh) = background.dimensions();
        let (ow, oh) = overlay.dimensions();

        if ow > bw || oh > bh {
            return Err(TicketError::Compositing(format!(
                "overlay {}x{} does not fit background {}x{}",
                ow, oh, bw, bh
            )));
        }

        let (x, y) = self.overlay_position((bw, bh), (ow, oh));
        tracing::trace!(x, y, bw, bh, ow, oh, "Placing overlay");

        let mut canvas = background.clone();
        imageops::replace(&mut canvas, overlay, i64::from(x), i64::from(y));
        Ok(canvas)
    }
}

/// Encode a raster as PNG
pub fn encode_png(image: &RgbaImage) -> TicketResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| TicketError::Compositing(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer.into_inner())
}
