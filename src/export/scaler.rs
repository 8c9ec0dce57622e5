//! Pre-export resize of the source photo.
//!
//! Runs before watermark rendering, so the watermark is laid out on the
//! final output dimensions.

use image::DynamicImage;

use super::config::{ExportSpec, ScaleMode, MAX_SCALE_PERCENT, MAX_SCALE_PIXELS, MIN_SCALE_PERCENT};
use super::error::ExportError;
use crate::resample::resize_rgba;

/// Output dimensions for a `width` x `height` source, or `None` when the
/// policy leaves the image as it is.
pub fn target_dimensions(width: u32, height: u32, spec: &ExportSpec) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let (w, h) = (width as f64, height as f64);

    let target = match spec.scale_mode {
        ScaleMode::None => return None,
        ScaleMode::Percent => {
            let percent = if spec.scale_value <= 0 {
                100
            } else {
                spec.scale_value.clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT)
            };
            let factor = percent as f64 / 100.0;
            (truncate(w * factor), truncate(h * factor))
        }
        ScaleMode::Width => {
            if spec.scale_value <= 0 {
                return None;
            }
            let new_width = spec.scale_value.min(MAX_SCALE_PIXELS) as f64;
            let ratio = new_width / w;
            (new_width as u32, truncate(h * ratio))
        }
        ScaleMode::Height => {
            if spec.scale_value <= 0 {
                return None;
            }
            let new_height = spec.scale_value.min(MAX_SCALE_PIXELS) as f64;
            let ratio = new_height / h;
            (truncate(w * ratio), new_height as u32)
        }
    };

    if target == (width, height) {
        None
    } else {
        Some(target)
    }
}

/// Apply the scale policy of `spec` to `image`.
pub fn scale_image(image: DynamicImage, spec: &ExportSpec) -> Result<DynamicImage, ExportError> {
    let (width, height) = (image.width(), image.height());
    let (target_w, target_h) = match target_dimensions(width, height, spec) {
        Some(target) => target,
        None => return Ok(image),
    };

    let resized = resize_rgba(&image.to_rgba8(), target_w, target_h)
        .map_err(|e| ExportError::Resize(e.to_string()))?;

    tracing::debug!(
        from_width = width,
        from_height = height,
        to_width = target_w,
        to_height = target_h,
        "Scaled source image"
    );

    Ok(DynamicImage::ImageRgba8(resized))
}

/// Truncate toward zero, never below one pixel.
fn truncate(value: f64) -> u32 {
    (value as u32).max(1)
}
