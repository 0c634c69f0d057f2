//! QR encoding of ticket codes
//!
//! Renders a QR symbol into a square grayscale raster. The module grid is
//! stretched over the requested width with a fractional scale, so the output
//! is exactly `width × width` pixels whatever the symbol version. Rendering is
//! deterministic: the same payload and options always give the same pixels.

use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};

use crate::error::TicketError;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// QR rendering options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrOptions {
    /// Error correction level
    pub ec_level: EcLevel,
    /// Output width (and height) in pixels
    pub width: u32,
    /// Quiet zone around the symbol, in modules
    pub margin: u32,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            width: 500,
            margin: 1,
        }
    }
}

/// Pixel scale used when `width` is too small for the symbol plus margin
const FALLBACK_SCALE: u32 = 4;

/// QR encoder
#[derive(Debug, Clone, Default)]
pub struct QrEncoder {
    options: QrOptions,
}

impl QrEncoder {
    pub fn new(options: QrOptions) -> Self {
        Self { options }
    }

    /// Encode `payload` into a grayscale raster
    ///
    /// **Errors:** [`TicketError::Encoding`] for an empty payload or one that
    /// exceeds the symbol capacity at the configured error correction level.
    pub fn encode(&self, payload: &str) -> Result<GrayImage, TicketError> {
        if payload.is_empty() {
            return Err(TicketError::Encoding("payload is empty".to_string()));
        }

        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.options.ec_level)
            .map_err(|e| TicketError::Encoding(format!("{} ({} bytes)", e, payload.len())))?;

        Ok(self.rasterize(&code))
    }

    fn rasterize(&self, code: &QrCode) -> GrayImage {
        let modules = code.width() as u32;
        let margin = self.options.margin;
        let grid = modules + 2 * margin;

        let size = if self.options.width >= grid {
            self.options.width
        } else {
            grid * FALLBACK_SCALE
        };
        let scale = size as f64 / grid as f64;
        let scaled_margin = margin as f64 * scale;
        let inner_end = size as f64 - scaled_margin;

        let to_module = |pixel: u32| -> Option<usize> {
            let p = pixel as f64;
            if p < scaled_margin || p >= inner_end {
                return None;
            }
            let module = ((p - scaled_margin) / scale).floor() as u32;
            Some(module.min(modules - 1) as usize)
        };

        GrayImage::from_fn(size, size, |x, y| match (to_module(x), to_module(y)) {
            (Some(mx), Some(my)) if code[(mx, my)] == Color::Dark => DARK,
            _ => LIGHT,
        })
    }
}
