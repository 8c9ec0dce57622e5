//! Watermark error types.
//!
//! Defines errors that can occur while resolving fonts and rendering layers.
//! Degenerate geometry (zero-size canvas, empty text) is not an error; the
//! renderer returns a blank layer instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorKind;

/// Errors that can occur during watermark processing.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Overlay image file does not exist
    #[error("Watermark image not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    /// Overlay image or font file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode watermark image
    #[error("Failed to decode watermark image: {0}")]
    Decode(String),

    /// Failed to render text or transform the overlay
    #[error("Failed to render watermark: {0}")]
    Render(String),

    /// Colour string is not `#RGB` or `#RRGGBB`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// No usable font, not even the embedded fallback
    #[error("No usable font: {0}")]
    FontUnavailable(String),
}

impl WatermarkError {
    /// Category of this error in the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ResourceNotFound(_) | Self::FontUnavailable(_) => ErrorKind::ResourceNotFound,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::Decode(_) | Self::Render(_) => ErrorKind::Processing,
            Self::InvalidColor(_) => ErrorKind::InvalidConfiguration,
        }
    }
}
