//! Export error types
//!
//! Every variant maps onto an [`ErrorKind`] so batch reports and the CLI
//! can tell configuration problems from per-image failures.

use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorKind;
use crate::watermark::WatermarkError;

#[derive(Error, Debug)]
pub enum ExportError {
    /// Output directory unset or equal to a source directory
    #[error("Invalid export configuration: {0}")]
    InvalidConfiguration(String),

    /// Source image does not exist
    #[error("Source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Reading a source or writing a target failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source image could not be decoded
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Pre-export scaling failed
    #[error("Resize failed: {0}")]
    Resize(String),

    /// Encoding the composed image failed
    #[error("Failed to encode to {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    #[error(transparent)]
    Watermark(#[from] WatermarkError),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn encode_failed(format: &'static str, message: impl Into<String>) -> Self {
        Self::Encode {
            format,
            message: message.into(),
        }
    }

    /// Category of this error in the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::SourceNotFound(_) => ErrorKind::ResourceNotFound,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::Decode { .. } | Self::Resize(_) | Self::Encode { .. } => ErrorKind::Processing,
            Self::Watermark(e) => e.kind(),
        }
    }
}
