//! Image watermark rendering.
//!
//! The overlay is loaded, scaled uniformly, faded by the opacity, rotated
//! with an expanded canvas, and pasted into a transparent layer at the
//! position resolved from its post-rotation size.

use std::path::Path;

use image::{imageops, Rgba, RgbaImage};

use super::config::WatermarkSpec;
use super::error::WatermarkError;
use super::position::{resolve_position, Extent};
use super::renderer::{Placement, RenderedLayer};
use crate::resample::resize_rgba;

/// Guards `ceil` against floating noise at right angles.
const EXTENT_EPSILON: f64 = 1e-6;

/// Render an image watermark layer of `canvas_width` x `canvas_height`.
pub fn render_image_layer(
    canvas_width: u32,
    canvas_height: u32,
    spec: &WatermarkSpec,
) -> Result<RenderedLayer, WatermarkError> {
    if canvas_width == 0 || canvas_height == 0 {
        return Ok(RenderedLayer::blank(canvas_width, canvas_height));
    }

    let path = match &spec.image_path {
        Some(path) => path,
        None => return Ok(RenderedLayer::blank(canvas_width, canvas_height)),
    };

    let overlay = load_overlay(path)?;

    let overlay = scale_overlay(&overlay, spec.image_scale)?;
    let overlay = apply_opacity(overlay, spec.opacity);
    let overlay = if spec.rotation == 0.0 {
        overlay
    } else {
        rotate_expand(&overlay, spec.rotation)
    };

    let content = Extent::from_pixels(overlay.width(), overlay.height());
    let offset = resolve_position(
        Extent::from_pixels(canvas_width, canvas_height),
        content,
        spec.position_ratio.clamped(),
    );
    let position = offset.to_placement();

    // Copy rather than blend: the overlay already carries its own alpha.
    let mut image = RgbaImage::new(canvas_width, canvas_height);
    imageops::replace(&mut image, &overlay, position.x as i64, position.y as i64);

    tracing::debug!(
        path = %path.display(),
        width = overlay.width(),
        height = overlay.height(),
        x = position.x,
        y = position.y,
        "Rendered image watermark"
    );

    Ok(RenderedLayer {
        image,
        placement: Some(Placement {
            offset,
            content,
            rotation_degrees: spec.rotation,
        }),
    })
}

fn load_overlay(path: &Path) -> Result<RgbaImage, WatermarkError> {
    if !path.is_file() {
        return Err(WatermarkError::ResourceNotFound(path.to_path_buf()));
    }
    let image = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(source) => WatermarkError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => WatermarkError::Decode(format!("{}: {}", path.display(), other)),
    })?;
    Ok(image.to_rgba8())
}

/// Scale both axes by `percent / 100`, each at least one pixel.
fn scale_overlay(overlay: &RgbaImage, percent: i32) -> Result<RgbaImage, WatermarkError> {
    let factor = percent.max(1) as f64 / 100.0;
    let width = ((overlay.width() as f64 * factor) as u32).max(1);
    let height = ((overlay.height() as f64 * factor) as u32).max(1);
    resize_rgba(overlay, width, height).map_err(|e| WatermarkError::Render(e.to_string()))
}

/// Multiply alpha by `opacity / 100`, rounding down. No-op at 100.
pub fn apply_opacity(mut overlay: RgbaImage, opacity: i32) -> RgbaImage {
    let opacity = opacity.clamp(0, 100) as u32;
    if opacity >= 100 {
        return overlay;
    }
    for pixel in overlay.pixels_mut() {
        pixel[3] = (pixel[3] as u32 * opacity / 100) as u8;
    }
    overlay
}

/// Rotate clockwise by `degrees`, growing the canvas to the rotated bounds.
///
/// Sampling is bilinear on premultiplied colour, with transparent pixels
/// outside the source, so edges fade instead of picking up dark fringes.
pub fn rotate_expand(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();

    let src_w = image.width() as f64;
    let src_h = image.height() as f64;

    let dst_w = ((src_w * cos.abs() + src_h * sin.abs()) - EXTENT_EPSILON)
        .ceil()
        .max(1.0) as u32;
    let dst_h = ((src_w * sin.abs() + src_h * cos.abs()) - EXTENT_EPSILON)
        .ceil()
        .max(1.0) as u32;

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let premultiplied = |x: i64, y: i64| -> [f64; 4] {
        if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
            return [0.0; 4];
        }
        let p = image.get_pixel(x as u32, y as u32);
        let a = p[3] as f64 / 255.0;
        [p[0] as f64 * a, p[1] as f64 * a, p[2] as f64 * a, p[3] as f64]
    };

    RgbaImage::from_fn(dst_w, dst_h, |dx, dy| {
        // Pixel centre relative to the destination centre, rotated back.
        let rx = dx as f64 + 0.5 - dst_cx;
        let ry = dy as f64 + 0.5 - dst_cy;
        let sx = rx * cos + ry * sin + src_cx - 0.5;
        let sy = -rx * sin + ry * cos + src_cy - 0.5;

        let x0 = sx.floor();
        let y0 = sy.floor();
        let fx = sx - x0;
        let fy = sy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let p00 = premultiplied(x0, y0);
        let p10 = premultiplied(x0 + 1, y0);
        let p01 = premultiplied(x0, y0 + 1);
        let p11 = premultiplied(x0 + 1, y0 + 1);

        let mut acc = [0.0f64; 4];
        for c in 0..4 {
            acc[c] = p00[c] * (1.0 - fx) * (1.0 - fy)
                + p10[c] * fx * (1.0 - fy)
                + p01[c] * (1.0 - fx) * fy
                + p11[c] * fx * fy;
        }

        let alpha = acc[3];
        if alpha < 0.5 {
            return Rgba([0, 0, 0, 0]);
        }
        let unpremultiply = |v: f64| (v * 255.0 / alpha).round().clamp(0.0, 255.0) as u8;
        Rgba([
            unpremultiply(acc[0]),
            unpremultiply(acc[1]),
            unpremultiply(acc[2]),
            alpha.round().clamp(0.0, 255.0) as u8,
        ])
    })
}
