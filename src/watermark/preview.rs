//! Interactive preview.
//!
//! A [`PreviewSession`] holds one source image and the current watermark
//! snapshot. It renders through the same [`WatermarkRenderer`] as export,
//! exposes the watermark's content box as a drag handle, and turns drag
//! gestures into new snapshots via the geometry mapper.
//!
//! The session may present a downscaled frame. Drag coordinates are given
//! in display pixels and converted back to source pixels before mapping,
//! so the stored ratio is the one export will use.

use image::RgbaImage;

use super::compositor::compose_layer;
use super::config::WatermarkSpec;
use super::error::WatermarkError;
use super::position::{resolve_ratio, Extent, PixelOffset};
use super::renderer::{RenderedLayer, WatermarkRenderer};
use crate::resample::resize_rgba;

/// Draggable box around the watermark, in display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragHandle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_degrees: f64,
}

/// Preview state for one source image.
#[derive(Debug)]
pub struct PreviewSession {
    source: RgbaImage,
    spec: WatermarkSpec,
    renderer: WatermarkRenderer,
    layer: RenderedLayer,
    /// Display pixels per source pixel, at most 1
    display_scale: f64,
}

impl PreviewSession {
    /// Start a session at full resolution.
    pub fn new(
        source: RgbaImage,
        spec: WatermarkSpec,
        renderer: WatermarkRenderer,
    ) -> Result<Self, WatermarkError> {
        let layer = renderer.render(source.width(), source.height(), &spec)?;
        Ok(Self {
            source,
            spec,
            renderer,
            layer,
            display_scale: 1.0,
        })
    }

    /// Limit the longest side of [`PreviewSession::frame`] to `max_side`.
    pub fn with_max_display_size(mut self, max_side: u32) -> Self {
        let longest = self.source.width().max(self.source.height());
        self.display_scale = if max_side == 0 || longest <= max_side {
            1.0
        } else {
            max_side as f64 / longest as f64
        };
        self
    }

    pub fn spec(&self) -> &WatermarkSpec {
        &self.spec
    }

    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    /// Replace the snapshot and re-render.
    pub fn update_spec(&mut self, spec: WatermarkSpec) -> Result<(), WatermarkError> {
        self.layer = self
            .renderer
            .render(self.source.width(), self.source.height(), &spec)?;
        self.spec = spec;
        Ok(())
    }

    /// The composited preview at display size.
    pub fn frame(&self) -> Result<RgbaImage, WatermarkError> {
        let composed = compose_layer(self.source.clone(), &self.layer);
        if self.display_scale >= 1.0 {
            return Ok(composed);
        }
        let width = ((composed.width() as f64 * self.display_scale) as u32).max(1);
        let height = ((composed.height() as f64 * self.display_scale) as u32).max(1);
        resize_rgba(&composed, width, height).map_err(|e| WatermarkError::Render(e.to_string()))
    }

    /// Content box of the current watermark, or `None` if nothing is drawn.
    pub fn handle(&self) -> Option<DragHandle> {
        self.layer.placement.map(|placement| DragHandle {
            x: placement.offset.x * self.display_scale,
            y: placement.offset.y * self.display_scale,
            width: placement.content.width * self.display_scale,
            height: placement.content.height * self.display_scale,
            rotation_degrees: placement.rotation_degrees,
        })
    }

    /// Move the handle by a display-space delta. Returns the new snapshot.
    pub fn drag_by(&mut self, dx: f64, dy: f64) -> Result<WatermarkSpec, WatermarkError> {
        match self.handle() {
            Some(handle) => self.drag_to(handle.x + dx, handle.y + dy),
            None => Ok(self.spec.clone()),
        }
    }

    /// Move the handle's top-left corner to a display-space point.
    /// Returns the new snapshot; past the edges the ratio saturates.
    pub fn drag_to(&mut self, x: f64, y: f64) -> Result<WatermarkSpec, WatermarkError> {
        let placement = match self.layer.placement {
            Some(placement) => placement,
            None => return Ok(self.spec.clone()),
        };

        let offset = PixelOffset::new(x / self.display_scale, y / self.display_scale);
        let canvas = Extent::from_pixels(self.source.width(), self.source.height());
        let ratio = resolve_ratio(canvas, placement.content, offset);

        let spec = self.spec.with_position_ratio(ratio);
        self.update_spec(spec.clone())?;

        tracing::debug!(x = ratio.x, y = ratio.y, "Watermark dragged");
        Ok(spec)
    }
}
