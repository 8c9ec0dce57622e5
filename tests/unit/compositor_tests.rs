// Compositor unit tests
// Identity on transparent layers and opacity extremes through the public API

use image::{DynamicImage, Rgba, RgbaImage};
use photomark::watermark::{
    compose, compose_layer, FontBook, RenderedLayer, WatermarkMode, WatermarkRenderer,
    WatermarkSpec,
};
use std::sync::Arc;

fn renderer() -> WatermarkRenderer {
    WatermarkRenderer::new(Arc::new(FontBook::embedded_only().unwrap()))
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90, 255])
    })
}

#[test]
fn test_compose_with_empty_layer_is_identity() {
    let base = gradient(120, 80);
    let out = compose_layer(base.clone(), &RenderedLayer::blank(120, 80));
    assert_eq!(out, base);
}

#[test]
fn test_zero_opacity_text_leaves_image_untouched() {
    let base = gradient(320, 200);
    let spec = WatermarkSpec {
        opacity: 0,
        shadow: true,
        outline: true,
        ..WatermarkSpec::default()
    };
    let out = compose(&DynamicImage::ImageRgba8(base.clone()), &spec, &renderer()).unwrap();
    assert_eq!(out, base);
}

#[test]
fn test_zero_opacity_image_overlay_leaves_image_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let overlay = dir.path().join("logo.png");
    RgbaImage::from_pixel(30, 30, Rgba([255, 0, 0, 255]))
        .save(&overlay)
        .unwrap();

    let base = gradient(100, 100);
    let spec = WatermarkSpec {
        mode: WatermarkMode::Image,
        image_path: Some(overlay),
        opacity: 0,
        rotation: 33.0,
        ..WatermarkSpec::default()
    };
    let out = compose(&DynamicImage::ImageRgba8(base.clone()), &spec, &renderer()).unwrap();
    assert_eq!(out, base);
}

#[test]
fn test_full_opacity_overlay_keeps_its_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let overlay = dir.path().join("logo.png");
    RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255]))
        .save(&overlay)
        .unwrap();

    let spec = WatermarkSpec {
        mode: WatermarkMode::Image,
        image_path: Some(overlay),
        opacity: 100,
        ..WatermarkSpec::default()
    };
    let layer = renderer().render(50, 50, &spec).unwrap();
    // (50 - 10) * 0.5 = 20
    assert_eq!(*layer.image.get_pixel(20, 20), Rgba([0, 255, 0, 255]));
    assert_eq!(*layer.image.get_pixel(29, 29), Rgba([0, 255, 0, 255]));

    let out = compose(
        &DynamicImage::ImageRgba8(gradient(50, 50)),
        &spec,
        &renderer(),
    )
    .unwrap();
    assert_eq!(*out.get_pixel(25, 25), Rgba([0, 255, 0, 255]));
}

#[test]
fn test_compose_converts_rgb_sources() {
    let rgb = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(64, 64, image::Rgb([1, 2, 3])));
    let out = compose(&rgb, &WatermarkSpec::default(), &renderer()).unwrap();
    assert_eq!(out.dimensions(), (64, 64));
    assert!(out.pixels().all(|p| p[3] == 255));
}
