use super::*;

#[test]
fn passthrough_adds_opaque_alpha_to_rgb() {
    let rgb = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
    let out = PassthroughRemover
        .remove(&DynamicImage::ImageRgb8(rgb))
        .unwrap();
    assert_eq!(out.dimensions(), (4, 3));
    assert_eq!(out.get_pixel(2, 1).0, [10, 20, 30, 255]);
}

#[test]
fn passthrough_keeps_existing_transparency() {
    let rgba = RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 0]));
    let out = PassthroughRemover
        .remove(&DynamicImage::ImageRgba8(rgba.clone()))
        .unwrap();
    assert_eq!(out, rgba);
}
