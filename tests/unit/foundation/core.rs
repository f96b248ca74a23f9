use super::*;

#[test]
fn canvas_rejects_empty_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert!(Canvas::new(800, 800).is_ok());
}

#[test]
fn premul_rounds_like_straight_over_black() {
    let p = Rgba8::rgba(255, 128, 0, 128).premul();
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::WHITE.premul().to_array(), [255, 255, 255, 255]);
}

#[test]
fn luminance_uses_perceptual_weights() {
    assert!((Rgba8::WHITE.luminance() - 255.0).abs() < 1e-9);
    assert_eq!(Rgba8::BLACK.luminance(), 0.0);
    let g = Rgba8::rgb(0, 255, 0).luminance();
    assert!((g - 0.587 * 255.0).abs() < 1e-9);
}
