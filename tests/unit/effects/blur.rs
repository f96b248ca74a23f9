use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    assert!(blur_rgba8_premul(&[0u8; 12], 2, 2, 1, 1.0).is_err());
}

#[test]
fn kernel_radius_tracks_sigma() {
    assert_eq!(kernel_radius(0.0), 0);
    assert_eq!(kernel_radius(f32::NAN), 0);
    assert_eq!(kernel_radius(6.0), 12);
    assert_eq!(kernel_radius(2.5), 5);
}

#[test]
fn layer_blur_matches_full_blur_and_keeps_far_pixels_clear() {
    let (w, h) = (40u32, 30u32);
    let mut layer = vec![0u8; (w * h * 4) as usize];
    let at = ((15 * w + 20) * 4) as usize;
    layer[at..at + 4].copy_from_slice(&[200, 100, 50, 255]);

    let sigma = 2.0;
    let full = blur_rgba8_premul(&layer, w, h, kernel_radius(sigma), sigma).unwrap();
    blur_layer_in_place(&mut layer, w, h, sigma).unwrap();
    assert_eq!(layer, full);

    let corner = 0usize;
    assert_eq!(&layer[corner..corner + 4], &[0, 0, 0, 0]);
    let sum_a: u32 = layer.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 6);
}

#[test]
fn layer_blur_of_empty_layer_is_noop() {
    let mut layer = vec![0u8; 16 * 16 * 4];
    blur_layer_in_place(&mut layer, 16, 16, 5.0).unwrap();
    assert!(layer.iter().all(|&b| b == 0));
}
