use super::*;
use crate::assets::color::HexColor;

fn canvas(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn fit_preserves_aspect_and_centers() {
    let spec = ProductImageSpec::default();
    let p = fit(400, 400, canvas(800, 800), &spec).unwrap();
    assert_eq!((p.width, p.height), (440, 440));
    assert_eq!((p.x, p.y), (180, 180));

    let wide = fit(1000, 200, canvas(800, 800), &spec).unwrap();
    assert_eq!((wide.width, wide.height), (480, 96));
    assert_eq!((wide.x, wide.y), (160, 352));
}

#[test]
fn fit_scales_up_small_products() {
    let spec = ProductImageSpec {
        max_width_pct: 70.0,
        max_height_pct: 65.0,
        glow_color: None,
    };
    let p = fit(10, 10, canvas(750, 352), &spec).unwrap();
    assert_eq!((p.width, p.height), (228, 228));
}

#[test]
fn fit_clamps_oversized_percentages_to_the_canvas() {
    let spec = ProductImageSpec {
        max_width_pct: 1e9,
        max_height_pct: 1e9,
        glow_color: None,
    };
    let p = fit(100, 100, canvas(800, 800), &spec).unwrap();
    assert_eq!((p.width, p.height), (800, 800));
    assert_eq!((p.x, p.y), (0, 0));

    let tall = fit(100, 200, canvas(800, 800), &spec).unwrap();
    assert_eq!((tall.width, tall.height), (400, 800));
}

#[test]
fn oversized_percentages_render_without_overflow() {
    let product = RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
    let mut base = Surface::filled(64, 64, Rgba8::WHITE);
    let mut raster = Rasterizer::default();
    let spec = ProductImageSpec {
        max_width_pct: 1e9,
        max_height_pct: 1e9,
        glow_color: None,
    };
    let placed = draw(&mut base, &mut raster, &product, &spec).unwrap().unwrap();
    assert_eq!((placed.width, placed.height), (64, 64));
    assert_eq!(base.pixel(32, 32), [255, 0, 0, 255]);
}

#[test]
fn fit_rejects_empty_sources() {
    assert!(fit(0, 10, canvas(100, 100), &ProductImageSpec::default()).is_none());
}

#[test]
fn transparent_product_pixels_do_not_occlude() {
    let mut product = RgbaImage::from_pixel(100, 100, image::Rgba([0, 0, 0, 0]));
    for y in 40..60 {
        for x in 40..60 {
            product.put_pixel(x, y, image::Rgba([255, 0, 0, 255]));
        }
    }
    let mut base = Surface::filled(200, 200, Rgba8::rgb(0, 0, 255));
    let mut raster = Rasterizer::default();
    let spec = ProductImageSpec {
        max_width_pct: 50.0,
        max_height_pct: 50.0,
        glow_color: None,
    };
    let placed = draw(&mut base, &mut raster, &product, &spec).unwrap().unwrap();
    assert_eq!((placed.x, placed.y, placed.width), (50, 50, 100));

    assert_eq!(base.pixel(100, 100), [255, 0, 0, 255]);
    assert_eq!(base.pixel(55, 55), [0, 0, 255, 255]);
}

#[test]
fn glow_brightens_around_the_product() {
    let product = RgbaImage::from_pixel(50, 50, image::Rgba([0, 255, 0, 255]));
    let mut base = Surface::filled(300, 300, Rgba8::BLACK);
    let mut raster = Rasterizer::default();
    let spec = ProductImageSpec {
        max_width_pct: 30.0,
        max_height_pct: 30.0,
        glow_color: Some(HexColor(Rgba8::WHITE)),
    };
    let placed = draw(&mut base, &mut raster, &product, &spec).unwrap().unwrap();

    let beside = base.pixel((placed.x - 10) as u32, 150);
    assert!(beside[0] > 0, "glow should leak past the product edge");
    assert_eq!(base.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(base.pixel(150, 150)[1], 255);
}

#[test]
fn shadow_darkens_below_the_product() {
    let product = RgbaImage::from_pixel(100, 100, image::Rgba([255, 255, 255, 255]));
    let mut base = Surface::filled(200, 240, Rgba8::WHITE);
    let mut raster = Rasterizer::default();
    let spec = ProductImageSpec {
        max_width_pct: 50.0,
        max_height_pct: 50.0,
        glow_color: None,
    };
    let placed = draw(&mut base, &mut raster, &product, &spec).unwrap().unwrap();
    let below = base.pixel(100, (placed.y + i64::from(placed.height) + 2) as u32);
    assert!(below[0] < 255);
}
