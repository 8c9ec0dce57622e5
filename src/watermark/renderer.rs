//! Single entry point that turns a [`WatermarkSpec`] into a layer.
//!
//! Both the preview and the exporter call [`WatermarkRenderer::render`];
//! neither repeats any layout math of its own.

use std::sync::Arc;

use image::RgbaImage;

use super::config::{WatermarkMode, WatermarkSpec, MAX_FONT_SIZE, MIN_FONT_SIZE};
use super::error::WatermarkError;
use super::font::{FontRequest, FontResolver};
use super::image_overlay::render_image_layer;
use super::position::{Extent, PixelOffset};
use super::text_renderer::render_text_layer;

/// Where the watermark's content box ended up on the canvas.
///
/// `content` is the unrotated box for text (rotation happens about its
/// centre) and the expanded post-rotation box for image overlays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub offset: PixelOffset,
    pub content: Extent,
    pub rotation_degrees: f64,
}

/// Transparent raster the size of the target canvas holding one watermark.
#[derive(Debug, Clone)]
pub struct RenderedLayer {
    pub image: RgbaImage,
    /// `None` when nothing was drawn
    pub placement: Option<Placement>,
}

impl RenderedLayer {
    /// Fully transparent layer.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            placement: None,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p[3] == 0)
    }
}

/// Renders watermark layers using a shared font service.
#[derive(Clone)]
pub struct WatermarkRenderer {
    fonts: Arc<dyn FontResolver>,
}

impl WatermarkRenderer {
    pub fn new(fonts: Arc<dyn FontResolver>) -> Self {
        Self { fonts }
    }

    /// Render `spec` onto a transparent canvas of the given size.
    ///
    /// A zero-sized canvas yields an empty layer of that size. Image mode
    /// without an overlay path yields a blank layer; a path that does not
    /// exist is [`WatermarkError::ResourceNotFound`].
    pub fn render(
        &self,
        canvas_width: u32,
        canvas_height: u32,
        spec: &WatermarkSpec,
    ) -> Result<RenderedLayer, WatermarkError> {
        match spec.mode {
            WatermarkMode::Text => {
                if canvas_width == 0 || canvas_height == 0 {
                    return Ok(RenderedLayer::blank(canvas_width, canvas_height));
                }
                let font = self.fonts.resolve(&FontRequest {
                    family: spec.font_family.clone(),
                    size_pt: spec.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE) as f32,
                    bold: spec.bold,
                    italic: spec.italic,
                });
                render_text_layer(canvas_width, canvas_height, spec, &font)
            }
            WatermarkMode::Image => render_image_layer(canvas_width, canvas_height, spec),
        }
    }
}

impl std::fmt::Debug for WatermarkRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkRenderer").finish_non_exhaustive()
    }
}
