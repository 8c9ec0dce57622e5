//! Watermark settings.
//!
//! [`WatermarkSpec`] is an immutable snapshot handed to every render call.
//! The surrounding application builds a fresh snapshot whenever the user
//! changes something; the renderer never mutates it.
//!
//! Snapshots round-trip through plain JSON-like dictionaries
//! ([`WatermarkSpec::to_dict`] / [`WatermarkSpec::from_dict`]) so templates
//! and session state can be stored by whatever backend the caller uses.
//!
//! ```yaml
//! mode: text
//! text: "© 2024 Jane Doe"
//! opacity: 60
//! font_size: 48
//! font_family: DejaVu Sans
//! color: "#FFCC00"
//! shadow: true
//! position_ratio: { x: 0.95, y: 0.95 }
//! rotation: -15
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::WatermarkError;
use super::position::PositionRatio;

pub const MIN_FONT_SIZE: i32 = 10;
pub const MAX_FONT_SIZE: i32 = 200;

// Default values
fn default_text() -> String {
    "Sample Watermark".to_string()
}

fn default_opacity() -> i32 {
    70
}

fn default_font_size() -> i32 {
    36
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_image_scale() -> i32 {
    100
}

/// Which field group of a watermark is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkMode {
    #[default]
    Text,
    Image,
}

/// RGB colour of the text fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Parse a hex colour string into RGB.
///
/// Supports `#RGB` and `#RRGGBB`. An empty string means white.
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let trimmed = hex.trim();
    if trimmed.is_empty() {
        return Ok(Color::white());
    }
    let digits = trimmed
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::InvalidColor(format!("{} must start with '#'", hex)))?;
    if !digits.is_ascii() {
        return Err(WatermarkError::InvalidColor(hex.to_string()));
    }

    let component = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| WatermarkError::InvalidColor(format!("invalid hex digit in {}", hex)))
    };

    match digits.len() {
        3 => {
            // 0xF -> 0xFF, 0xA -> 0xAA
            Ok(Color::new(
                component(0..1)? * 17,
                component(1..2)? * 17,
                component(2..3)? * 17,
            ))
        }
        6 => Ok(Color::new(component(0..2)?, component(2..4)?, component(4..6)?)),
        n => Err(WatermarkError::InvalidColor(format!(
            "{} must be #RGB or #RRGGBB, got {} digits",
            hex, n
        ))),
    }
}

/// Accepts an integer, a float or a numeric string for integer fields.
/// Floats truncate toward zero and saturate at the `i32` range.
pub(crate) fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let value = match Number::deserialize(deserializer)? {
        Number::Int(n) => return Ok(n.clamp(i32::MIN as i64, i32::MAX as i64) as i32),
        Number::Float(f) => f,
        Number::Text(text) => {
            let text = text.trim();
            if let Ok(n) = text.parse::<i64>() {
                return Ok(n.clamp(i32::MIN as i64, i32::MAX as i64) as i32);
            }
            text.parse::<f64>().map_err(|_| {
                serde::de::Error::custom(format!("expected a number, got '{}'", text))
            })?
        }
    };

    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "expected a finite number, got {}",
            value
        )));
    }
    Ok(value.trunc() as i32)
}

/// Watermark settings snapshot.
///
/// Missing dictionary keys fall back to the defaults below. Out-of-range
/// numbers are accepted on input and clamped by [`WatermarkSpec::sanitized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkSpec {
    pub mode: WatermarkMode,

    /// Text content, one rendered line per `\n`
    pub text: String,

    /// Opacity percent, 0 (invisible) to 100 (as drawn)
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub opacity: i32,

    /// Font size in points (10-200)
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub font_size: i32,

    pub font_family: String,
    pub bold: bool,
    pub italic: bool,

    /// Fill colour as `#RRGGBB`
    pub color: String,

    pub shadow: bool,
    pub outline: bool,

    /// Rotation in degrees, positive values rotate clockwise
    pub rotation: f64,

    pub position_ratio: PositionRatio,

    /// Overlay file for image mode
    pub image_path: Option<PathBuf>,

    /// Uniform overlay scale in percent (>= 1)
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub image_scale: i32,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            mode: WatermarkMode::Text,
            text: default_text(),
            opacity: default_opacity(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            bold: false,
            italic: false,
            color: default_color(),
            shadow: false,
            outline: false,
            rotation: 0.0,
            position_ratio: PositionRatio::default(),
            image_path: None,
            image_scale: default_image_scale(),
        }
    }
}

impl WatermarkSpec {
    /// Serialize into a JSON dictionary.
    pub fn to_dict(&self) -> serde_json::Value {
        // Plain data with string keys; serialization cannot fail.
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

    /// Copy with every numeric field forced into its valid range.
    pub fn sanitized(mut self) -> Self {
        self.opacity = self.opacity.clamp(0, 100);
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.image_scale = self.image_scale.max(1);
        self.position_ratio = self.position_ratio.clamped();
        if !self.rotation.is_finite() {
            self.rotation = 0.0;
        }
        self
    }

    /// Copy with a new position ratio, used by drag handling.
    pub fn with_position_ratio(&self, ratio: PositionRatio) -> Self {
        Self {
            position_ratio: ratio.clamped(),
            ..self.clone()
        }
    }

    /// Parsed fill colour.
    pub fn fill_color(&self) -> Result<Color, WatermarkError> {
        parse_hex_color(&self.color)
    }

    /// Opacity as a `0.0..=1.0` factor.
    pub fn opacity_factor(&self) -> f32 {
        self.opacity.clamp(0, 100) as f32 / 100.0
    }
}
