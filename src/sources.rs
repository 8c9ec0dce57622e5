//! Source image discovery.
//!
//! Expands directories recursively, keeps supported image files, and drops
//! duplicates while preserving first-seen order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extensions accepted as watermark sources (lower case, no dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// True when `path` has a supported image extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Collect image files from a mix of file and directory paths.
///
/// Directory contents are visited in file-name order. Paths that do not
/// exist are skipped with a warning.
pub fn collect_sources<P: AsRef<Path>>(paths: &[P]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    let mut push = |path: &Path| {
        if !is_supported_image(path) {
            return;
        }
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if seen.insert(key) {
            sources.push(path.to_path_buf());
        }
    };

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
            {
                push(entry.path());
            }
        } else if path.is_file() {
            push(path);
        } else {
            tracing::warn!(path = %path.display(), "Skipping missing source");
        }
    }

    sources
}
