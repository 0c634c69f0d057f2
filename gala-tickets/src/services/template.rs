//! Background template access
//!
//! The template is a read-only PNG on disk. It is read and decoded afresh for
//! every artifact, so replacing the file takes effect on the next ticket
//! without a restart.

use image::RgbaImage;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{TicketError, TicketResult};

/// Handle on the background template file
#[derive(Debug, Clone)]
pub struct TicketTemplate {
    path: PathBuf,
}

impl TicketTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_present(&self) -> bool {
        self.path.is_file()
    }

    /// Fail with [`TicketError::TemplateMissing`] unless the file exists
    pub fn ensure_present(&self) -> TicketResult<()> {
        if self.is_present() {
            Ok(())
        } else {
            Err(TicketError::TemplateMissing(self.path.clone()))
        }
    }

    /// Read and decode the template as RGBA
    ///
    /// **Errors:**
    /// - [`TicketError::TemplateMissing`] if the file does not exist
    /// - [`TicketError::Compositing`] if it cannot be read or decoded
    pub fn load(&self) -> TicketResult<RgbaImage> {
        let bytes = std::fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TicketError::TemplateMissing(self.path.clone()),
            _ => TicketError::Compositing(format!(
                "cannot read template {}: {}",
                self.path.display(),
                e
            )),
        })?;

        let decoded = image::load_from_memory(&bytes).map_err(|e| {
            TicketError::Compositing(format!(
                "cannot decode template {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(decoded.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use tempfile::TempDir;

    #[test]
    fn test_missing_template_is_distinct_error() {
        let dir = TempDir::new().unwrap();
        let template = TicketTemplate::new(dir.path().join("ticket.png"));

        assert!(!template.is_present());
        assert!(matches!(template.ensure_present(), Err(TicketError::TemplateMissing(_))));
        assert!(matches!(template.load(), Err(TicketError::TemplateMissing(_))));
    }

    #[test]
    fn test_undecodable_template_is_compositing_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ticket.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let template = TicketTemplate::new(&path);

        assert!(template.ensure_present().is_ok());
        assert!(matches!(template.load(), Err(TicketError::Compositing(_))));
    }

    #[test]
    fn test_directory_is_not_a_template() {
        let dir = TempDir::new().unwrap();
        let template = TicketTemplate::new(dir.path());

        assert!(!template.is_present());
    }

    #[test]
    fn test_load_decodes_to_rgba() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ticket.png");
        RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let loaded = TicketTemplate::new(&path).load().unwrap();

        assert_eq!(loaded.dimensions(), (40, 30));
        assert_eq!(loaded.get_pixel(5, 5), &Rgba([10, 20, 30, 255]));
    }
}
