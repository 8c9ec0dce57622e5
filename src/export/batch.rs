//! Single and batch export.
//!
//! Each image runs through decode, scale, compose, encode and write, one
//! after another on the calling thread. A failing image is recorded in the
//! [`BatchReport`] and the batch moves on. Configuration problems are
//! reported before any image is touched.

use std::path::{Path, PathBuf};

use super::config::ExportSpec;
use super::encoder::{encoder_for_path, EncoderQuality};
use super::error::ExportError;
use super::naming::resolve_output_path;
use super::scaler::scale_image;
use crate::error::ErrorKind;
use crate::watermark::{compose, WatermarkRenderer, WatermarkSpec};

/// One image that could not be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFailure {
    pub file_name: String,
    pub kind: ErrorKind,
    pub reason: String,
}

impl std::fmt::Display for ExportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file_name, self.reason)
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Written files, in source order
    pub exported: Vec<PathBuf>,
    pub failures: Vec<ExportFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Check that an output directory is set and is not the parent directory
/// of any source. Returns the directory to export into.
pub fn validate_output_dir(
    output_dir: Option<&Path>,
    sources: &[PathBuf],
) -> Result<PathBuf, ExportError> {
    let output_dir = match output_dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => {
            return Err(ExportError::InvalidConfiguration(
                "output directory is not set".to_string(),
            ))
        }
    };

    let normalized_output = normalize_dir(output_dir);
    for source in sources {
        let parent = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if normalize_dir(parent) == normalized_output {
            return Err(ExportError::InvalidConfiguration(format!(
                "output directory {} is the source directory of {}",
                output_dir.display(),
                source.display()
            )));
        }
    }

    Ok(output_dir.to_path_buf())
}

/// Canonical form when the directory exists, the path as given otherwise.
fn normalize_dir(dir: &Path) -> PathBuf {
    dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
}

/// Runs exports with a shared renderer.
#[derive(Debug, Clone)]
pub struct Exporter {
    renderer: WatermarkRenderer,
}

impl Exporter {
    pub fn new(renderer: WatermarkRenderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &WatermarkRenderer {
        &self.renderer
    }

    /// Export one image into `output_dir` and return the written path.
    ///
    /// The caller is responsible for having validated `output_dir`.
    pub fn export_one(
        &self,
        source: &Path,
        watermark: &WatermarkSpec,
        export: &ExportSpec,
        output_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        if !source.is_file() {
            return Err(ExportError::SourceNotFound(source.to_path_buf()));
        }

        let image = image::open(source).map_err(|e| match e {
            image::ImageError::IoError(err) => ExportError::io(source, err),
            other => ExportError::Decode {
                path: source.to_path_buf(),
                message: other.to_string(),
            },
        })?;

        let image = scale_image(image, export)?;
        let composed = compose(&image, watermark, &self.renderer)?;

        std::fs::create_dir_all(output_dir).map_err(|e| ExportError::io(output_dir, e))?;
        let target = resolve_output_path(source, export, output_dir);

        let encoder = encoder_for_path(&target);
        let data = encoder.encode(&composed, EncoderQuality::with_quality(export.jpeg_quality))?;
        std::fs::write(&target, data).map_err(|e| ExportError::io(&target, e))?;

        tracing::info!(
            source = %source.display(),
            target = %target.display(),
            format = encoder.format_name(),
            width = composed.width(),
            height = composed.height(),
            "Exported image"
        );

        Ok(target)
    }

    /// Export every source. Fails only on configuration errors; per-image
    /// failures end up in the report.
    pub fn export_all(
        &self,
        sources: &[PathBuf],
        watermark: &WatermarkSpec,
        export: &ExportSpec,
    ) -> Result<BatchReport, ExportError> {
        let output_dir = validate_output_dir(export.output_dir.as_deref(), sources)?;

        tracing::info!(
            count = sources.len(),
            output_dir = %output_dir.display(),
            "Starting batch export"
        );

        let mut report = BatchReport::default();
        for source in sources {
            match self.export_one(source, watermark, export, &output_dir) {
                Ok(target) => report.exported.push(target),
                Err(e) => {
                    let file_name = source
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| source.display().to_string());
                    tracing::warn!(source = %source.display(), error = %e, "Export failed");
                    report.failures.push(ExportFailure {
                        file_name,
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            exported = report.exported.len(),
            failed = report.failures.len(),
            "Batch export finished"
        );

        Ok(report)
    }
}
