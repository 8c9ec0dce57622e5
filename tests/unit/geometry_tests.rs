// Geometry mapper unit tests
// Round-trip and saturation behaviour of the ratio <-> offset mapping

use photomark::watermark::position::{
    available_space, resolve_position, resolve_ratio, Extent, PixelOffset, PositionRatio,
};
use rstest::rstest;

#[rstest]
#[case(1920.0, 1080.0, 300.0, 80.0)]
#[case(640.0, 480.0, 640.0, 10.0)]
#[case(100.0, 100.0, 99.5, 0.0)]
#[case(4000.0, 3000.0, 1.0, 1.0)]
fn test_round_trip_reproduces_ratio(
    #[case] cw: f64,
    #[case] ch: f64,
    #[case] ow: f64,
    #[case] oh: f64,
) {
    let container = Extent::new(cw, ch);
    let content = Extent::new(ow, oh);

    for step in 0..=20 {
        let t = step as f64 / 20.0;
        let ratio = PositionRatio::new(t, (t * 7.0) % 1.0);
        let offset = resolve_position(container, content, ratio);
        let back = resolve_ratio(container, content, offset);
        assert!((back.x - ratio.x).abs() < 1e-9, "{:?} -> {:?}", ratio, back);
        assert!((back.y - ratio.y).abs() < 1e-9, "{:?} -> {:?}", ratio, back);
    }
}

#[test]
fn test_oversized_content_clamps_to_boundary() {
    let container = Extent::new(100.0, 100.0);
    let content = Extent::new(500.0, 500.0);

    assert_eq!(available_space(container, content), (1.0, 1.0));
    let ratio = resolve_ratio(container, content, PixelOffset::new(-400.0, 50.0));
    assert_eq!(ratio, PositionRatio::new(0.0, 1.0));
}

#[test]
fn test_drag_offsets_saturate_at_edges() {
    let container = Extent::new(800.0, 600.0);
    let content = Extent::new(200.0, 100.0);

    let far = resolve_ratio(container, content, PixelOffset::new(1e6, 1e6));
    assert_eq!(far, PositionRatio::new(1.0, 1.0));
    let near = resolve_ratio(container, content, PixelOffset::new(-1e6, -1e6));
    assert_eq!(near, PositionRatio::new(0.0, 0.0));
}

#[test]
fn test_position_is_proportional_per_axis() {
    let offset = resolve_position(
        Extent::new(1000.0, 500.0),
        Extent::new(200.0, 100.0),
        PositionRatio::new(0.25, 0.75),
    );
    // 0.25 * 800 = 200, 0.75 * 400 = 300
    assert_eq!(offset, PixelOffset::new(200.0, 300.0));
}
