//! Export settings.
//!
//! [`ExportSpec`] is read once per export call. Like the watermark spec it
//! round-trips through JSON dictionaries for the caller's persistence layer.
//!
//! ```yaml
//! output_dir: /photos/out
//! output_format: auto      # auto | jpeg | png
//! naming_mode: suffix      # original | prefix | suffix
//! suffix: _wm
//! jpeg_quality: 90
//! scale_mode: width        # none | width | height | percent
//! scale_value: 1920
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::watermark::config::deserialize_whole_number;

pub const MIN_SCALE_PERCENT: i32 = 1;
pub const MAX_SCALE_PERCENT: i32 = 400;
pub const MAX_SCALE_PIXELS: i32 = 10_000;

// Default values
fn default_prefix() -> String {
    "wm_".to_string()
}

fn default_suffix() -> String {
    "_watermarked".to_string()
}

fn default_jpeg_quality() -> i32 {
    95
}

fn default_scale_value() -> i32 {
    100
}

/// Encoding of the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Keep `.jpg`/`.jpeg`/`.png` from the source, otherwise PNG
    #[default]
    Auto,
    Jpeg,
    Png,
}

/// How the output file stem is derived from the source stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    #[default]
    Original,
    Prefix,
    Suffix,
}

/// Resize applied to the source before watermarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    #[default]
    None,
    Width,
    Height,
    Percent,
}

/// Export settings snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSpec {
    /// Target directory; must not be the parent of any source
    pub output_dir: Option<PathBuf>,
    pub output_format: OutputFormat,
    pub naming_mode: NamingMode,
    pub prefix: String,
    pub suffix: String,
    /// JPEG quality, 0-100
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub jpeg_quality: i32,
    pub scale_mode: ScaleMode,
    /// Percent for `percent`, pixels for `width`/`height`
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub scale_value: i32,
}

impl Default for ExportSpec {
    fn default() -> Self {
        Self {
            output_dir: None,
            output_format: OutputFormat::Auto,
            naming_mode: NamingMode::Original,
            prefix: default_prefix(),
            suffix: default_suffix(),
            jpeg_quality: default_jpeg_quality(),
            scale_mode: ScaleMode::None,
            scale_value: default_scale_value(),
        }
    }
}

impl ExportSpec {
    /// Serialize into a JSON dictionary.
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Build a spec from a JSON dictionary. `null` yields the defaults.
    pub fn from_dict(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let spec: Self = serde_json::from_value(value.clone())?;
        Ok(spec.sanitized())
    }

    /// Copy with numeric fields forced into range.
    ///
    /// Non-positive pixel targets are kept so the scaler can skip them; a
    /// non-positive percentage falls back to 100.
    pub fn sanitized(mut self) -> Self {
        self.jpeg_quality = self.jpeg_quality.clamp(0, 100);
        self.scale_value = match self.scale_mode {
            ScaleMode::Percent if self.scale_value <= 0 => default_scale_value(),
            ScaleMode::Percent => self.scale_value.clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT),
            ScaleMode::Width | ScaleMode::Height if self.scale_value > 0 => {
                self.scale_value.min(MAX_SCALE_PIXELS)
            }
            _ => self.scale_value,
        };
        if self
            .output_dir
            .as_ref()
            .map(|dir| dir.as_os_str().is_empty())
            .unwrap_or(false)
        {
            self.output_dir = None;
        }
        self
    }

    /// Copy with a different output directory.
    pub fn with_output_dir(&self, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(output_dir.into()),
            ..self.clone()
        }
    }
}
