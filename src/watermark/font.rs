//! Font resolution.
//!
//! Text rendering asks a [`FontResolver`] for a face matching
//! `(family, size, bold, italic)`. [`FontBook`] answers by searching the
//! configured directories and the platform font directories, then a list of
//! common default families, and finally the font embedded in the binary.
//! When only the regular face of a family exists, bold and italic are
//! synthesized at render time.
//!
//! Building a [`FontBook`] fails only when the embedded fallback cannot be
//! parsed. After that, resolution always succeeds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::error::WatermarkError;

/// Embedded fallback face (DejaVu Sans Mono, Bitstream Vera license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

/// Families tried, in order, when the requested one is not installed.
const DEFAULT_FAMILIES: &[&str] = &["DejaVu Sans", "Arial", "Liberation Sans", "Helvetica"];

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

const REGULAR_SUFFIXES: &[&str] = &["", "regular", "book", "roman", "r"];
const BOLD_SUFFIXES: &[&str] = &["bold", "bd", "b"];
const ITALIC_SUFFIXES: &[&str] = &["italic", "oblique", "it", "i"];
const BOLD_ITALIC_SUFFIXES: &[&str] = &["bolditalic", "boldoblique", "bi", "z"];

fn default_use_system_fonts() -> bool {
    true
}

/// Where to look for font files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Extra directories searched before the platform ones
    #[serde(default)]
    pub search_dirs: Vec<PathBuf>,

    /// Also search the platform font directories (default: true)
    #[serde(default = "default_use_system_fonts")]
    pub use_system_fonts: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            search_dirs: Vec::new(),
            use_system_fonts: default_use_system_fonts(),
        }
    }
}

/// What a text layer needs from the font service.
#[derive(Debug, Clone, PartialEq)]
pub struct FontRequest {
    pub family: String,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
}

/// Where a resolved face came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Embedded,
}

/// A renderable face plus the styling the renderer must fake.
#[derive(Clone)]
pub struct ResolvedFont {
    pub font: FontArc,
    pub size_pt: f32,
    pub synthetic_bold: bool,
    pub synthetic_italic: bool,
    pub source: FontSource,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("size_pt", &self.size_pt)
            .field("synthetic_bold", &self.synthetic_bold)
            .field("synthetic_italic", &self.synthetic_italic)
            .field("source", &self.source)
            .finish()
    }
}

impl ResolvedFont {
    /// Pixel size at 96 DPI.
    pub fn px_size(&self) -> f32 {
        pt_to_px(self.size_pt)
    }
}

/// Convert points to pixels at 96 DPI.
pub fn pt_to_px(pt: f32) -> f32 {
    pt * 96.0 / 72.0
}

/// Font resolution service consumed by the text renderer.
pub trait FontResolver: Send + Sync {
    /// Resolve a face. Implementations fall back rather than fail.
    fn resolve(&self, request: &FontRequest) -> ResolvedFont;
}

/// Directory-scanning resolver with an embedded fallback.
pub struct FontBook {
    search_dirs: Vec<PathBuf>,
    embedded: FontArc,
    // normalized file stem -> path, built on first lookup
    index: Mutex<Option<HashMap<String, PathBuf>>>,
    loaded: Mutex<HashMap<PathBuf, Option<FontArc>>>,
}

impl FontBook {
    /// Build a font book. Fails only if the embedded fallback is unusable.
    pub fn new(config: &FontConfig) -> Result<Self, WatermarkError> {
        let embedded = FontArc::try_from_slice(EMBEDDED_FONT_DATA)
            .map_err(|e| WatermarkError::FontUnavailable(format!("embedded font: {}", e)))?;

        let mut search_dirs = config.search_dirs.clone();
        if config.use_system_fonts {
            search_dirs.extend(platform_font_dirs());
        }
        search_dirs.retain(|dir| dir.is_dir());

        tracing::debug!(dirs = search_dirs.len(), "Font book initialized");

        Ok(Self {
            search_dirs,
            embedded,
            index: Mutex::new(None),
            loaded: Mutex::new(HashMap::new()),
        })
    }

    /// A font book that always answers with the embedded face.
    pub fn embedded_only() -> Result<Self, WatermarkError> {
        Self::new(&FontConfig {
            search_dirs: Vec::new(),
            use_system_fonts: false,
        })
    }

    fn lookup(&self, family: &str, suffixes: &[&str]) -> Option<(PathBuf, FontArc)> {
        let family = normalize(family);
        if family.is_empty() {
            return None;
        }

        let candidates: Vec<PathBuf> = {
            let mut index = self.index.lock();
            let index = index.get_or_insert_with(|| build_index(&self.search_dirs));
            suffixes
                .iter()
                .filter_map(|suffix| index.get(&format!("{}{}", family, suffix)).cloned())
                .collect()
        };

        candidates
            .into_iter()
            .find_map(|path| self.load(&path).map(|font| (path, font)))
    }

    fn load(&self, path: &Path) -> Option<FontArc> {
        let mut loaded = self.loaded.lock();
        if let Some(cached) = loaded.get(path) {
            return cached.clone();
        }

        let font = match std::fs::read(path) {
            Ok(bytes) => match FontArc::try_from_vec(bytes) {
                Ok(font) => Some(font),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unparsable font");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable font");
                None
            }
        };
        loaded.insert(path.to_path_buf(), font.clone());
        font
    }

    fn resolve_family(&self, family: &str, request: &FontRequest) -> Option<ResolvedFont> {
        let styled = match (request.bold, request.italic) {
            (true, true) => Some(BOLD_ITALIC_SUFFIXES),
            (true, false) => Some(BOLD_SUFFIXES),
            (false, true) => Some(ITALIC_SUFFIXES),
            (false, false) => None,
        };

        if let Some(suffixes) = styled {
            if let Some((path, font)) = self.lookup(family, suffixes) {
                return Some(ResolvedFont {
                    font,
                    size_pt: request.size_pt,
                    synthetic_bold: false,
                    synthetic_italic: false,
                    source: FontSource::File(path),
                });
            }
        }

        self.lookup(family, REGULAR_SUFFIXES)
            .map(|(path, font)| ResolvedFont {
                font,
                size_pt: request.size_pt,
                synthetic_bold: request.bold,
                synthetic_italic: request.italic,
                source: FontSource::File(path),
            })
    }
}

impl FontResolver for FontBook {
    fn resolve(&self, request: &FontRequest) -> ResolvedFont {
        if let Some(font) = self.resolve_family(&request.family, request) {
            return font;
        }

        for family in DEFAULT_FAMILIES {
            if let Some(font) = self.resolve_family(family, request) {
                tracing::debug!(
                    requested = %request.family,
                    fallback = family,
                    "Font family not found, using default"
                );
                return font;
            }
        }

        ResolvedFont {
            font: self.embedded.clone(),
            size_pt: request.size_pt,
            synthetic_bold: request.bold,
            synthetic_italic: request.italic,
            source: FontSource::Embedded,
        }
    }
}

/// Lower-case alphanumerics only, so "DejaVu Sans" matches "DejaVuSans.ttf".
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn build_index(dirs: &[PathBuf]) -> HashMap<String, PathBuf> {
    let mut index = HashMap::new();
    for dir in dirs {
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if !is_font {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                // First directory wins so configured dirs shadow system ones.
                index
                    .entry(normalize(stem))
                    .or_insert_with(|| path.to_path_buf());
            }
        }
    }
    index
}

fn platform_font_dirs() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut dirs = Vec::new();

    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = &home {
            dirs.push(home.join("Library/Fonts"));
        }
    } else if cfg!(target_os = "windows") {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = &home {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }

    dirs
}
