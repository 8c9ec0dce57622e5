//! Lanczos3 resampling of RGBA rasters.
//!
//! Colour channels are premultiplied by alpha before convolution and divided
//! back afterwards, so transparent pixels do not bleed dark fringes into
//! the edges of overlays.

use std::num::NonZeroU32;

use fast_image_resize::{FilterType, Image, MulDiv, PixelType, ResizeAlg, Resizer};
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Resize failed: {0}")]
pub struct ResizeError(pub String);

impl ResizeError {
    fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Resize `src` to exactly `target_w` x `target_h`.
pub fn resize_rgba(src: &RgbaImage, target_w: u32, target_h: u32) -> Result<RgbaImage, ResizeError> {
    if src.dimensions() == (target_w, target_h) {
        return Ok(src.clone());
    }

    let src_width =
        NonZeroU32::new(src.width()).ok_or_else(|| ResizeError::new("Source width is 0"))?;
    let src_height =
        NonZeroU32::new(src.height()).ok_or_else(|| ResizeError::new("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ResizeError::new("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ResizeError::new("Target height is 0"))?;

    let mut src_image = Image::from_vec_u8(
        src_width,
        src_height,
        src.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| ResizeError::new(format!("Failed to create source image: {:?}", e)))?;

    let mul_div = MulDiv::default();
    mul_div
        .multiply_alpha_inplace(&mut src_image.view_mut())
        .map_err(|e| ResizeError::new(format!("Alpha premultiply failed: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ResizeError::new(format!("Resize operation failed: {:?}", e)))?;

    mul_div
        .divide_alpha_inplace(&mut dst_image.view_mut())
        .map_err(|e| ResizeError::new(format!("Alpha unpremultiply failed: {:?}", e)))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ResizeError::new("Failed to create output image buffer"))
}
