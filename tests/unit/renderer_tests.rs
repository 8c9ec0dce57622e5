// Renderer unit tests
// Layer shape, degenerate input, and rotation behaviour of WatermarkRenderer

use photomark::watermark::text_renderer::layer_transform;
use photomark::watermark::{
    Extent, FontBook, PixelOffset, PositionRatio, WatermarkError, WatermarkMode,
    WatermarkRenderer, WatermarkSpec,
};
use std::sync::Arc;

fn renderer() -> WatermarkRenderer {
    WatermarkRenderer::new(Arc::new(FontBook::embedded_only().unwrap()))
}

#[test]
fn test_layer_is_canvas_sized_and_transparent_elsewhere() {
    let spec = WatermarkSpec {
        text: "Mark".into(),
        position_ratio: PositionRatio::new(0.0, 0.0),
        ..WatermarkSpec::default()
    };
    let layer = renderer().render(500, 400, &spec).unwrap();
    assert_eq!(layer.dimensions(), (500, 400));

    let placement = layer.placement.unwrap();
    let right = placement.content.width.ceil() as u32 + 1;
    let bottom = placement.content.height.ceil() as u32 + 1;
    for (x, y, p) in layer.image.enumerate_pixels() {
        if x > right || y > bottom {
            assert_eq!(p[3], 0, "stray pixel at {},{}", x, y);
        }
    }
}

#[test]
fn test_zero_rotation_matches_unrotated_render() {
    let base = WatermarkSpec {
        text: "Same\nBytes".into(),
        shadow: true,
        outline: true,
        ..WatermarkSpec::default()
    };
    let negative_zero = WatermarkSpec {
        rotation: -0.0,
        ..base.clone()
    };

    let a = renderer().render(300, 200, &base).unwrap();
    let b = renderer().render(300, 200, &negative_zero).unwrap();
    assert_eq!(a.image.as_raw(), b.image.as_raw());

    let t = layer_transform(PixelOffset::new(5.0, 6.0), Extent::new(10.0, 10.0), 0.0);
    assert_eq!(t, tiny_skia_translate(5.0, 6.0));
}

fn tiny_skia_translate(x: f32, y: f32) -> tiny_skia::Transform {
    tiny_skia::Transform::from_translate(x, y)
}

#[test]
fn test_rendering_is_deterministic() {
    let spec = WatermarkSpec {
        rotation: 37.5,
        ..WatermarkSpec::default()
    };
    let a = renderer().render(400, 300, &spec).unwrap();
    let b = renderer().render(400, 300, &spec).unwrap();
    assert_eq!(a.image, b.image);
}

#[test]
fn test_degenerate_canvas_yields_empty_layer() {
    let layer = renderer().render(0, 0, &WatermarkSpec::default()).unwrap();
    assert_eq!(layer.dimensions(), (0, 0));
    assert!(layer.placement.is_none());

    let overlay = WatermarkSpec {
        mode: WatermarkMode::Image,
        image_path: Some("/no/such.png".into()),
        ..WatermarkSpec::default()
    };
    let layer = renderer().render(0, 0, &overlay).unwrap();
    assert_eq!(layer.dimensions(), (0, 0));
    assert!(layer.is_blank());
}

#[test]
fn test_missing_overlay_reports_resource_not_found() {
    let spec = WatermarkSpec {
        mode: WatermarkMode::Image,
        image_path: Some("missing/logo.png".into()),
        ..WatermarkSpec::default()
    };
    let err = renderer().render(10, 10, &spec).unwrap_err();
    assert!(matches!(err, WatermarkError::ResourceNotFound(_)));
    assert_eq!(err.kind(), photomark::error::ErrorKind::ResourceNotFound);
}
