//! Export pipeline: scale, watermark, name, encode, write.
//!
//! ```yaml
//! export:
//!   output_dir: /photos/out
//!   output_format: auto
//!   naming_mode: suffix
//!   suffix: _wm
//!   scale_mode: percent
//!   scale_value: 50
//! ```

pub mod batch;
pub mod config;
pub mod encoder;
pub mod error;
pub mod naming;
pub mod scaler;

pub use batch::{validate_output_dir, BatchReport, ExportFailure, Exporter};
pub use config::{ExportSpec, NamingMode, OutputFormat, ScaleMode};
pub use error::ExportError;
pub use naming::{output_extension, resolve_output_path};
pub use scaler::{scale_image, target_dimensions};
