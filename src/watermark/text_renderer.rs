//! Text watermark rendering.
//!
//! Lines of text are turned into one vector path built from the glyph
//! outlines, trimmed to its tight bounding box, placed with the geometry
//! mapper and rasterized onto a transparent canvas.
//!
//! # Features
//!
//! - Multi-line text stacked at the font's line spacing
//! - Opacity, drop shadow and black outline
//! - Clockwise rotation about the centre of the text box
//! - Synthetic bold and italic when the font has no styled face
//!
//! # Example
//!
//! ```ignore
//! use photomark::watermark::font::{FontBook, FontRequest, FontResolver};
//! use photomark::watermark::text_renderer::render_text_layer;
//! use photomark::watermark::WatermarkSpec;
//!
//! let fonts = FontBook::embedded_only()?;
//! let spec = WatermarkSpec { text: "Copyright 2025".into(), ..Default::default() };
//! let font = fonts.resolve(&FontRequest {
//!     family: spec.font_family.clone(),
//!     size_pt: spec.font_size as f32,
//!     bold: false,
//!     italic: false,
//! });
//! let layer = render_text_layer(1920, 1080, &spec, &font)?;
//! ```

use ab_glyph::{Font, GlyphId, OutlineCurve, Point, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform,
};

use super::config::{Color, WatermarkSpec};
use super::error::WatermarkError;
use super::font::ResolvedFont;
use super::position::{resolve_position, Extent, PixelOffset};
use super::renderer::{Placement, RenderedLayer};

/// Horizontal shear applied for synthetic italic.
const ITALIC_SKEW: f32 = 0.2;

/// Stroke width of synthetic bold, relative to the pixel size.
const BOLD_STROKE_RATIO: f32 = 0.04;

/// Shadow alpha relative to the fill alpha.
const SHADOW_ALPHA_RATIO: f32 = 0.6;

/// Render a text watermark layer of `canvas_width` x `canvas_height`.
///
/// Empty or whitespace-only text produces a blank layer.
pub fn render_text_layer(
    canvas_width: u32,
    canvas_height: u32,
    spec: &WatermarkSpec,
    font: &ResolvedFont,
) -> Result<RenderedLayer, WatermarkError> {
    let color = spec.fill_color()?;

    if canvas_width == 0 || canvas_height == 0 {
        return Ok(RenderedLayer::blank(canvas_width, canvas_height));
    }

    let path = match build_text_path(&spec.text, font) {
        Some(path) => path,
        None => return Ok(RenderedLayer::blank(canvas_width, canvas_height)),
    };

    let path = if font.synthetic_italic {
        path.transform(Transform::from_row(1.0, 0.0, -ITALIC_SKEW, 1.0, 0.0, 0.0))
            .ok_or_else(|| WatermarkError::Render("italic shear produced no path".to_string()))?
    } else {
        path
    };

    // Move the ink's tight box (not the control-point box) to the origin.
    let bounds = match path.compute_tight_bounds() {
        Some(bounds) => bounds,
        None => return Ok(RenderedLayer::blank(canvas_width, canvas_height)),
    };
    let path = path
        .transform(Transform::from_translate(-bounds.left(), -bounds.top()))
        .ok_or_else(|| WatermarkError::Render("text path collapsed".to_string()))?;
    let content = Extent::new(bounds.width() as f64, bounds.height() as f64);

    let canvas = Extent::from_pixels(canvas_width, canvas_height);
    let offset = resolve_position(canvas, content, spec.position_ratio.clamped());
    let transform = layer_transform(offset, content, spec.rotation);

    let mut pixmap = Pixmap::new(canvas_width, canvas_height).ok_or_else(|| {
        WatermarkError::Render(format!(
            "cannot allocate {}x{} canvas",
            canvas_width, canvas_height
        ))
    })?;

    let size_pt = font.size_pt;
    let alpha = (255.0 * spec.opacity_factor()).round() as u8;

    if spec.shadow {
        let shadow_offset = (size_pt * 0.08).max(2.0);
        let shadow_alpha = (alpha as f32 * SHADOW_ALPHA_RATIO) as u8;
        pixmap.fill_path(
            &path,
            &solid_paint(Color::black(), shadow_alpha),
            FillRule::Winding,
            transform.pre_translate(shadow_offset, shadow_offset),
            None,
        );
    }

    let fill = solid_paint(color, alpha);
    pixmap.fill_path(&path, &fill, FillRule::Winding, transform, None);

    if font.synthetic_bold {
        let stroke = Stroke {
            width: font.px_size() * BOLD_STROKE_RATIO,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &fill, &stroke, transform, None);
    }

    if spec.outline {
        let stroke = Stroke {
            width: (size_pt * 0.1).max(1.5),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &solid_paint(Color::black(), alpha),
            &stroke,
            transform,
            None,
        );
    }

    tracing::debug!(
        width = content.width,
        height = content.height,
        x = offset.x,
        y = offset.y,
        rotation = spec.rotation,
        "Rendered text watermark"
    );

    Ok(RenderedLayer {
        image: pixmap_to_rgba(&pixmap),
        placement: Some(Placement {
            offset,
            content,
            rotation_degrees: spec.rotation,
        }),
    })
}

/// Canvas transform for content placed at `offset`, rotated clockwise about
/// its own centre. A zero angle yields a pure translation.
pub fn layer_transform(offset: PixelOffset, content: Extent, rotation_degrees: f64) -> Transform {
    let placed = Transform::from_translate(offset.x as f32, offset.y as f32);
    if rotation_degrees == 0.0 {
        return placed;
    }
    placed.pre_concat(Transform::from_rotate_at(
        rotation_degrees as f32,
        (content.width / 2.0) as f32,
        (content.height / 2.0) as f32,
    ))
}

/// Build one path holding every glyph outline of every line.
///
/// Baselines sit at `ascent + i * (height + line_gap)`; blank lines still
/// advance. Returns `None` when nothing has an outline.
fn build_text_path(text: &str, font: &ResolvedFont) -> Option<Path> {
    let scale = font
        .font
        .pt_to_px_scale(font.size_pt)
        .unwrap_or_else(|| PxScale::from(font.px_size()));
    let scaled = font.font.as_scaled(scale);
    let h_factor = scaled.h_scale_factor();
    let v_factor = scaled.v_scale_factor();
    let line_height = scaled.height() + scaled.line_gap();

    let lines: Vec<&str> = if text.is_empty() {
        vec![""]
    } else {
        text.lines().collect()
    };

    let mut builder = PathBuilder::new();
    for (index, line) in lines.iter().enumerate() {
        let baseline = scaled.ascent() + index as f32 * line_height;
        let mut cursor = 0.0f32;
        let mut prev_glyph: Option<GlyphId> = None;

        for c in line.chars() {
            let glyph_id = scaled.glyph_id(c);
            if let Some(prev) = prev_glyph {
                cursor += scaled.kern(prev, glyph_id);
            }

            if let Some(outline) = font.font.outline(glyph_id) {
                // Font units are y-up; the canvas is y-down.
                let origin = cursor;
                append_outline(&mut builder, &outline.curves, |p: Point| {
                    (origin + p.x * h_factor, baseline - p.y * v_factor)
                });
            }

            cursor += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }
    }

    builder.finish()
}

fn append_outline(
    builder: &mut PathBuilder,
    curves: &[OutlineCurve],
    map: impl Fn(Point) -> (f32, f32),
) {
    let mut last: Option<(f32, f32)> = None;

    for curve in curves {
        let start = match curve {
            OutlineCurve::Line(p0, _)
            | OutlineCurve::Quad(p0, _, _)
            | OutlineCurve::Cubic(p0, _, _, _) => map(*p0),
        };

        // A curve that does not continue the previous one starts a contour.
        if last != Some(start) {
            if last.is_some() {
                builder.close();
            }
            builder.move_to(start.0, start.1);
        }

        let end = match curve {
            OutlineCurve::Line(_, p1) => {
                let end = map(*p1);
                builder.line_to(end.0, end.1);
                end
            }
            OutlineCurve::Quad(_, p1, p2) => {
                let ctrl = map(*p1);
                let end = map(*p2);
                builder.quad_to(ctrl.0, ctrl.1, end.0, end.1);
                end
            }
            OutlineCurve::Cubic(_, p1, p2, p3) => {
                let c1 = map(*p1);
                let c2 = map(*p2);
                let end = map(*p3);
                builder.cubic_to(c1.0, c1.1, c2.0, c2.1, end.0, end.1);
                end
            }
        };
        last = Some(end);
    }

    if last.is_some() {
        builder.close();
    }
}

fn solid_paint(color: Color, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}

/// Convert tiny-skia's premultiplied pixels to straight alpha.
fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}
