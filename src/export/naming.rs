//! Output file naming.
//!
//! Existing files are not checked; a later export to the same name
//! overwrites the earlier one.

use std::path::{Path, PathBuf};

use super::config::{ExportSpec, NamingMode, OutputFormat};

/// Source extensions that `auto` format keeps as they are.
const PASSTHROUGH_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Extension (without the dot) of the exported file.
pub fn output_extension(source: &Path, format: OutputFormat) -> String {
    match format {
        OutputFormat::Jpeg => "jpg".to_string(),
        OutputFormat::Png => "png".to_string(),
        OutputFormat::Auto => source
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .filter(|ext| PASSTHROUGH_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or_else(|| "png".to_string()),
    }
}

/// Derive the export path for `source` inside `output_dir`.
pub fn resolve_output_path(source: &Path, spec: &ExportSpec, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match spec.naming_mode {
        NamingMode::Original => stem,
        NamingMode::Prefix => format!("{}{}", spec.prefix, stem),
        NamingMode::Suffix => format!("{}{}", stem, spec.suffix),
    };

    output_dir.join(format!(
        "{}.{}",
        stem,
        output_extension(source, spec.output_format)
    ))
}
