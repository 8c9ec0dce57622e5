// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::ExportSpec;
use crate::logging::LoggingConfig;
use crate::watermark::{FontConfig, WatermarkMode, WatermarkSpec};

/// Job file: what to stamp, where to write it, and which photos to process.
///
/// ```yaml
/// watermark:
///   text: "© ${PHOTOGRAPHER}"
///   opacity: 60
/// export:
///   output_dir: ./out
///   naming_mode: suffix
///   suffix: _wm
/// sources:
///   - ./photos
/// fonts:
///   search_dirs: [./fonts]
/// logging:
///   level: info
///   format: pretty
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watermark: WatermarkSpec,
    #[serde(default)]
    pub export: ExportSpec,
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    #[serde(default)]
    pub fonts: FontConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        if substituted.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Config = serde_yaml::from_str(&substituted).map_err(|e| e.to_string())?;
        config.watermark = config.watermark.sanitized();
        config.export = config.export.sanitized();

        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.watermark
            .fill_color()
            .map_err(|e| format!("Watermark color: {}", e))?;

        if self.watermark.mode == WatermarkMode::Image && self.watermark.image_path.is_none() {
            return Err("Image watermark requires 'image_path'".to_string());
        }

        self.logging.validate()?;

        Ok(())
    }
}
