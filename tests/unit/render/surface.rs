use super::*;

#[test]
fn filled_surface_is_premultiplied() {
    let s = Surface::filled(2, 1, Rgba8::rgba(255, 0, 0, 128));
    assert_eq!(s.pixel(0, 0), [128, 0, 0, 128]);
    assert_eq!(s.pixel(5, 5), [0, 0, 0, 0]);
}

#[test]
fn rows_fill_each_line() {
    let s = Surface::from_rows(3, &[Rgba8::WHITE, Rgba8::BLACK]);
    assert_eq!((s.width, s.height), (3, 2));
    assert_eq!(s.pixel(2, 0), [255, 255, 255, 255]);
    assert_eq!(s.pixel(1, 1), [0, 0, 0, 255]);
}

#[test]
fn over_requires_matching_layer() {
    let mut base = Surface::filled(4, 4, Rgba8::WHITE);
    assert!(base.over(&Surface::new(3, 4)).is_err());

    let mut layer = Surface::new(4, 4);
    layer.data[0..4].copy_from_slice(&[0, 0, 0, 255]);
    base.over(&layer).unwrap();
    assert_eq!(base.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(base.pixel(1, 0), [255, 255, 255, 255]);
}

#[test]
fn brightness_and_flatten_on_opaque_surface() {
    let mut base = Surface::filled(10, 10, Rgba8::WHITE);
    base.over_at(&Surface::filled(5, 10, Rgba8::BLACK), 0, 0)
        .unwrap();
    assert_eq!(base.brightness(0, 0, 5, 10), 0.0);
    assert!((base.brightness(5, 0, 5, 10) - 255.0).abs() < 1e-9);

    let rgb = base.flatten().unwrap();
    assert_eq!(rgb.dimensions(), (10, 10));
    assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(rgb.get_pixel(9, 9).0, [255, 255, 255]);
}

#[test]
fn rgba_round_trip_keeps_straight_colors() {
    let img = RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]));
    let s = Surface::from_rgba(&img);
    assert_eq!(s.to_rgba_image().unwrap(), img);
}

#[test]
fn rasterizer_fills_shapes_into_transparent_layer() {
    let mut raster = Rasterizer::default();
    let layer = raster
        .layer(20, 20, |ctx| {
            fill_shape(ctx, &kurbo::Rect::new(5.0, 5.0, 15.0, 15.0), Rgba8::rgb(0, 0, 255));
        })
        .unwrap();
    assert_eq!(layer.pixel(10, 10), [0, 0, 255, 255]);
    assert_eq!(layer.pixel(1, 1), [0, 0, 0, 0]);

    let again = raster.layer(20, 20, |_| {}).unwrap();
    assert!(again.data.iter().all(|&b| b == 0));
}
