//! Watermark rendering and compositing.
//!
//! A [`WatermarkSpec`] describes one text or image watermark. The
//! [`WatermarkRenderer`] turns it into a transparent [`RenderedLayer`] the
//! size of the target canvas, and the compositor blends that layer onto the
//! photo. Preview and export share the same renderer, so what is dragged on
//! screen is what ends up in the file.
//!
//! # Features
//!
//! - **Text watermarks** with multi-line layout, shadow, outline, bold/italic
//! - **Image watermarks** with uniform scaling and expanding rotation
//! - **Ratio-based placement** independent of image resolution
//! - **Font lookup** across configured and platform directories with an
//!   embedded fallback
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   mode: text
//!   text: "© Jane Doe"
//!   opacity: 60
//!   font_size: 48
//!   outline: true
//!   position_ratio: { x: 1.0, y: 1.0 }
//!   rotation: 0
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod font;
pub mod image_overlay;
pub mod position;
pub mod preview;
pub mod renderer;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{blend_over, compose, compose_layer};
pub use config::{parse_hex_color, Color, WatermarkMode, WatermarkSpec};
pub use error::WatermarkError;
pub use font::{FontBook, FontConfig, FontRequest, FontResolver, ResolvedFont};
pub use position::{
    resolve_position, resolve_ratio, Extent, PixelOffset, PlacementPosition, PositionRatio,
};
pub use preview::{DragHandle, PreviewSession};
pub use renderer::{Placement, RenderedLayer, WatermarkRenderer};
