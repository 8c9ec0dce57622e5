// Error classification shared by the watermark and export modules

use std::fmt;

/// Coarse failure category reported to callers.
///
/// Per-image failures (`ResourceNotFound`, `IoFailure`, `Processing`) are
/// collected and the batch continues. `InvalidConfiguration` aborts before
/// any image is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Overlay image or font file missing
    ResourceNotFound,

    /// Output directory unset or colliding with a source directory
    InvalidConfiguration,

    /// Read or write failure for a specific path
    IoFailure,

    /// Decode, resize, render or encode failure
    Processing,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ResourceNotFound => write!(f, "resource not found"),
            ErrorKind::InvalidConfiguration => write!(f, "invalid configuration"),
            ErrorKind::IoFailure => write!(f, "I/O failure"),
            ErrorKind::Processing => write!(f, "processing failure"),
        }
    }
}
