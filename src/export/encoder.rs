//! Encoding of composed images.
//!
//! The encoder is picked from the resolved output extension: `.jpg` and
//! `.jpeg` are written as JPEG with the alpha channel dropped, everything
//! else as RGBA PNG.

use std::io::Cursor;
use std::path::Path;

use image::{ImageEncoder as _, RgbaImage};

use super::error::ExportError;

/// Quality settings for image encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    /// Quality value (1-100, where 100 is best quality)
    pub quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self { quality: 95 }
    }
}

impl EncoderQuality {
    /// Quality from a 0-100 setting. JPEG needs at least 1.
    pub fn with_quality(quality: i32) -> Self {
        Self {
            quality: quality.clamp(1, 100) as u8,
        }
    }
}

/// Trait for image encoders
pub trait ImageEncoder: Send + Sync {
    /// Short format name used in errors and logs
    fn format_name(&self) -> &'static str;

    /// Encode an RGBA raster
    fn encode(&self, image: &RgbaImage, quality: EncoderQuality) -> Result<Vec<u8>, ExportError>;

    /// Check if this encoder keeps the alpha channel
    fn supports_transparency(&self) -> bool;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format_name(&self) -> &'static str {
        "jpeg"
    }

    fn encode(&self, image: &RgbaImage, quality: EncoderQuality) -> Result<Vec<u8>, ExportError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;

        // JPEG has no alpha channel
        let rgb_data = rgba_to_rgb(image.as_raw());

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, quality.quality);

        encoder
            .write_image(
                &rgb_data,
                image.width(),
                image.height(),
                image::ColorType::Rgb8,
            )
            .map_err(|e| ExportError::encode_failed("jpeg", e.to_string()))?;

        Ok(output.into_inner())
    }

    fn supports_transparency(&self) -> bool {
        false
    }
}

/// PNG encoder using the image crate
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format_name(&self) -> &'static str {
        "png"
    }

    fn encode(&self, image: &RgbaImage, _quality: EncoderQuality) -> Result<Vec<u8>, ExportError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);

        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )
            .map_err(|e| ExportError::encode_failed("png", e.to_string()))?;

        Ok(output.into_inner())
    }

    fn supports_transparency(&self) -> bool {
        true
    }
}

/// Encoder matching the extension of `target`.
pub fn encoder_for_path(target: &Path) -> Box<dyn ImageEncoder> {
    let is_jpeg = target
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false);

    if is_jpeg {
        Box::new(JpegEncoder)
    } else {
        Box::new(PngEncoder)
    }
}

/// Drop the alpha channel, keeping colour values as they are.
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}
