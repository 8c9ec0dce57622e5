//! Watermark compositor for blending rendered layers onto images.
//!
//! The source is converted to straight-alpha RGBA, a layer is rendered at
//! the source's dimensions, and the layer is blended on top with the
//! standard "over" operator. The result keeps its alpha channel; callers
//! writing formats without alpha flatten it themselves.
//!
//! # Example
//!
//! ```ignore
//! use photomark::watermark::compositor::compose;
//!
//! let photo = image::open("photo.jpg")?;
//! let marked = compose(&photo, &spec, &renderer)?;
//! marked.save("photo_wm.png")?;
//! ```

use image::{DynamicImage, Rgba, RgbaImage};

use super::config::WatermarkSpec;
use super::error::WatermarkError;
use super::renderer::{RenderedLayer, WatermarkRenderer};

/// Render `spec` for `image` and blend it on top.
pub fn compose(
    image: &DynamicImage,
    spec: &WatermarkSpec,
    renderer: &WatermarkRenderer,
) -> Result<RgbaImage, WatermarkError> {
    let base = image.to_rgba8();
    let layer = renderer.render(base.width(), base.height(), spec)?;
    Ok(compose_layer(base, &layer))
}

/// Blend `layer` over `base`. Pixels outside the overlap are untouched.
pub fn compose_layer(mut base: RgbaImage, layer: &RenderedLayer) -> RgbaImage {
    if layer.placement.is_none() {
        return base;
    }

    let width = base.width().min(layer.image.width());
    let height = base.height().min(layer.image.height());

    for y in 0..height {
        for x in 0..width {
            let fg = *layer.image.get_pixel(x, y);
            if fg[3] == 0 {
                continue;
            }
            let bg = *base.get_pixel(x, y);
            base.put_pixel(x, y, blend_over(bg, fg));
        }
    }

    base
}

/// Porter-Duff "over" on straight-alpha pixels.
pub fn blend_over(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    match foreground[3] {
        0 => return background,
        255 => return foreground,
        _ => {}
    }

    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    let blend = |fg: u8, bg: u8| -> u8 {
        let value =
            (fg as f32 * fg_alpha + bg as f32 * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(foreground[0], background[0]),
        blend(foreground[1], background[1]),
        blend(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
