//! Mapping between normalized position ratios and pixel offsets.
//!
//! A watermark's content box travels inside its container. The travel space
//! on each axis is `max(container - content, 1)`, so a ratio of `0.0` pins
//! the box to the top/left edge and `1.0` to the bottom/right edge. The same
//! mapping is used to place rendered layers and to turn a dragged preview
//! handle back into a ratio.
//!
//! # Example
//!
//! ```ignore
//! use photomark::watermark::position::{resolve_position, Extent, PositionRatio};
//!
//! let canvas = Extent::new(800.0, 600.0);
//! let content = Extent::new(100.0, 50.0);
//!
//! let offset = resolve_position(canvas, content, PositionRatio::new(1.0, 0.5));
//! assert_eq!((offset.x, offset.y), (700.0, 275.0)); // 800 - 100, (600 - 50) / 2
//! ```

use serde::{Deserialize, Serialize};

/// Width and height of a canvas or of a watermark's content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent of a pixel raster.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }
}

/// Normalized placement, each axis in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRatio {
    pub x: f64,
    pub y: f64,
}

impl Default for PositionRatio {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl PositionRatio {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Saturate both axes into `[0, 1]`. NaN collapses to `0`.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_unit(self.x),
            y: clamp_unit(self.y),
        }
    }
}

/// Offset of the content box's top-left corner inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelOffset {
    pub x: f64,
    pub y: f64,
}

impl PixelOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whole-pixel placement, truncating toward zero.
    pub fn to_placement(self) -> PlacementPosition {
        PlacementPosition::new(self.x as i32, self.y as i32)
    }
}

/// A single integer position where a raster should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Travel space per axis. Never below one pixel so the inverse mapping
/// cannot divide by zero when the content fills or exceeds the container.
pub fn available_space(container: Extent, content: Extent) -> (f64, f64) {
    (
        (container.width - content.width).max(1.0),
        (container.height - content.height).max(1.0),
    )
}

/// Convert a ratio into the pixel offset of the content box.
pub fn resolve_position(container: Extent, content: Extent, ratio: PositionRatio) -> PixelOffset {
    let (avail_x, avail_y) = available_space(container, content);
    PixelOffset::new(ratio.x * avail_x, ratio.y * avail_y)
}

/// Convert a pixel offset back into a ratio, saturating at the edges.
pub fn resolve_ratio(container: Extent, content: Extent, offset: PixelOffset) -> PositionRatio {
    let (avail_x, avail_y) = available_space(container, content);
    PositionRatio::new(offset.x / avail_x, offset.y / avail_y).clamped()
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
