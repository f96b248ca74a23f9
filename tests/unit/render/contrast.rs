use serde_json::json;

use super::*;

fn element(v: serde_json::Value) -> ElementSpec {
    serde_json::from_value(v).unwrap()
}

#[test]
fn region_spans_full_width_when_centered_else_half() {
    let c = Canvas {
        width: 800,
        height: 600,
    };
    assert_eq!(
        sample_region(Coord::Center, Coord::Px(40.0), 30.0, c),
        Rect::new(0.0, 40.0, 800.0, 70.0)
    );
    assert_eq!(
        sample_region(Coord::Px(100.0), Coord::Px(40.0), 30.0, c),
        Rect::new(100.0, 40.0, 500.0, 70.0)
    );
    assert_eq!(sample_region(Coord::Center, Coord::Center, 100.0, c).y0, 250.0);
}

#[test]
fn dark_regions_get_light_text_with_dark_stroke() {
    let p = palette(TextRole::Price, 30.0);
    assert_eq!(p.fill, Rgba8::rgb(0xFF, 0xC5, 0x3D));
    assert_eq!(p.stroke.map(|s| s.color), Some(Rgba8::BLACK));

    let t = palette(TextRole::Title, 127.9);
    assert!(t.fill.luminance() > 200.0);

    let s = palette(TextRole::SellingPoints, 0.0);
    assert_eq!(s.fill.r, 255);
    assert!(s.fill.a < 255);
    assert!(s.chip.is_some());
}

#[test]
fn light_or_ambiguous_regions_get_dark_text() {
    for b in [128.0, 255.0] {
        let p = palette(TextRole::Price, b);
        assert_eq!(p.fill, Rgba8::rgb(0xC0, 0x39, 0x2B));
        assert_eq!(p.stroke.map(|s| s.color), Some(Rgba8::WHITE));
        assert!(palette(TextRole::Title, b).fill.luminance() < 50.0);
    }
}

#[test]
fn adapt_samples_under_each_element() {
    let mut base = Surface::filled(200, 200, Rgba8::WHITE);
    base.over_at(&Surface::filled(200, 100, Rgba8::BLACK), 0, 0)
        .unwrap();

    let top = element(json!({"type": "title", "x": "center", "y": 10, "font_size": 20}));
    let bottom = element(json!({"type": "title", "x": "center", "y": 150, "font_size": 20}));
    assert!(adapt(&base, &top, 0).unwrap().fill.luminance() > 200.0);
    assert!(adapt(&base, &bottom, 0).unwrap().fill.luminance() < 50.0);

    let product = element(json!({"type": "product_image"}));
    assert!(adapt(&base, &product, 0).is_none());
}

#[test]
fn planned_height_follows_layout() {
    let vertical = element(json!({"type": "selling_points", "font_size": 18}));
    let (_, _, _, h) = plan(&vertical, 3).unwrap();
    assert_eq!(h, 3.0 * 34.0);

    let price = element(json!({"type": "price", "font_size": 40}));
    let (role, _, _, h) = plan(&price, 0).unwrap();
    assert_eq!(role, TextRole::Price);
    assert_eq!(h, 40.0);
}

#[test]
fn badge_prices_keep_their_template_paint() {
    for color in [Rgba8::WHITE, Rgba8::BLACK] {
        let base = Surface::filled(200, 200, color);
        let badge = element(json!({"type": "price", "x": 20, "y": 20, "style": "badge"}));
        assert!(plan(&badge, 0).is_none());
        assert!(adapt(&base, &badge, 0).is_none());

        let plain = element(json!({"type": "price", "x": 20, "y": 20}));
        assert!(adapt(&base, &plain, 0).is_some());
    }
}
