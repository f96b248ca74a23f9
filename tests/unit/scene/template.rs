use serde_json::json;

use super::*;

fn parse(v: serde_json::Value) -> MainshotResult<Template> {
    Template::from_json_str(&v.to_string())
}

#[test]
fn minimal_template_takes_defaults() {
    let tpl = parse(json!({
        "canvas": {"width": 800, "height": 800},
        "elements": [{"type": "product_image"}]
    }))
    .unwrap();

    assert_eq!(tpl.background.kind, BackgroundKind::Solid);
    assert_eq!(tpl.background.colors, vec![HexColor(Rgba8::WHITE)]);
    assert_eq!(
        tpl.elements,
        vec![ElementSpec::ProductImage(ProductImageSpec::default())]
    );
}

#[test]
fn full_element_set_parses_in_order() {
    let tpl = parse(json!({
        "name": "促销爆款",
        "platform": "taobao",
        "canvas": {"width": 800, "height": 800},
        "background": {
            "type": "gradient",
            "colors": ["#FF4D4F", "#FFF1F0"],
            "overlay_color": "#000000",
            "bokeh": {"color": "#FFD666", "count": 12, "seed": 7}
        },
        "elements": [
            {"type": "product_image", "max_width_pct": 70, "glow_color": "#FFFFFF"},
            {"type": "title", "x": "center", "y": 40, "font_size": 36, "style": "banner", "font_weight": "bold"},
            {"type": "price", "x": 40, "y": 680, "style": "badge", "prefix": "$"},
            {"type": "selling_points", "x": "center", "y": 600, "layout": "horizontal"}
        ]
    }))
    .unwrap();

    assert_eq!(tpl.platform.as_deref(), Some("taobao"));
    assert_eq!(tpl.background.bokeh.map(|b| (b.count, b.seed)), Some((12, 7)));
    let kinds: Vec<&str> = tpl
        .elements
        .iter()
        .map(|e| match e {
            ElementSpec::ProductImage(_) => "product_image",
            ElementSpec::Title(_) => "title",
            ElementSpec::Price(_) => "price",
            ElementSpec::SellingPoints(_) => "selling_points",
        })
        .collect();
    assert_eq!(kinds, ["product_image", "title", "price", "selling_points"]);

    let ElementSpec::Title(title) = &tpl.elements[1] else {
        panic!("title expected");
    };
    assert_eq!(title.x, Coord::Center);
    assert_eq!(title.y, Coord::Px(40.0));
    assert_eq!(title.style, TitleStyle::Banner);
    assert_eq!(title.font_weight, FontWeight::Bold);

    let ElementSpec::Price(price) = &tpl.elements[2] else {
        panic!("price expected");
    };
    assert_eq!(price.prefix, "$");
    assert_eq!(price.style, PriceStyle::Badge);
}

#[test]
fn unknown_variants_fall_back_to_defaults() {
    let tpl = parse(json!({
        "canvas": {"width": 100, "height": 100},
        "elements": [
            {"type": "selling_points", "layout": "diagonal", "color": "not-a-color"},
            {"type": "price", "style": "fancy", "font_weight": "heavy"}
        ]
    }))
    .unwrap();

    let ElementSpec::SellingPoints(sp) = &tpl.elements[0] else {
        panic!("selling_points expected");
    };
    assert_eq!(sp.layout, PointsLayout::Vertical);
    assert_eq!(sp.color.rgba(), Rgba8::BLACK);
    assert_eq!(sp.bg_color.rgba(), Rgba8::rgba(255, 0, 0, 0xCC));

    let ElementSpec::Price(p) = &tpl.elements[1] else {
        panic!("price expected");
    };
    assert_eq!(p.style, PriceStyle::Plain);
    assert_eq!(p.font_weight, FontWeight::Normal);
    assert_eq!(p.prefix, "¥");
}

#[test]
fn missing_or_empty_canvas_is_fatal() {
    let missing = parse(json!({"elements": []})).unwrap_err();
    assert!(matches!(missing, MainshotError::Serde(_)));

    let empty = parse(json!({"canvas": {"width": 0, "height": 10}})).unwrap_err();
    assert!(matches!(empty, MainshotError::Validation(_)));
}

#[test]
fn non_positive_sizes_are_rejected() {
    let err = parse(json!({
        "canvas": {"width": 10, "height": 10},
        "elements": [{"type": "title", "font_size": 0}]
    }))
    .unwrap_err();
    assert!(err.to_string().contains("elements[0]"));

    assert!(
        parse(json!({
            "canvas": {"width": 10, "height": 10},
            "elements": [{"type": "product_image", "max_width_pct": -5}]
        }))
        .is_err()
    );
}

#[test]
fn product_percentages_stay_within_the_canvas() {
    let with_pct = |w: f64, h: f64| {
        parse(json!({
            "canvas": {"width": 800, "height": 800},
            "elements": [{"type": "product_image", "max_width_pct": w, "max_height_pct": h}]
        }))
    };
    assert!(with_pct(100.0, 100.0).is_ok());
    assert!(with_pct(0.5, 30.0).is_ok());

    let err = with_pct(1e9, 50.0).unwrap_err();
    assert!(matches!(err, MainshotError::Validation(_)));
    assert!(err.to_string().contains("elements[0]"));
    assert!(with_pct(50.0, 100.5).is_err());
    assert!(with_pct(0.0, 50.0).is_err());
}

#[test]
fn bokeh_count_is_capped() {
    let with_count = |count: u32| {
        parse(json!({
            "canvas": {"width": 800, "height": 800},
            "background": {"type": "gradient", "bokeh": {"count": count}}
        }))
    };
    assert!(with_count(BokehSpec::MAX_COUNT).is_ok());

    let err = with_count(u32::MAX).unwrap_err();
    assert!(matches!(err, MainshotError::Validation(_)));
    assert!(err.to_string().contains("bokeh.count"));
}

#[test]
fn coord_resolution() {
    assert_eq!(Coord::Center.resolve(800.0, 201.0), 299.0);
    assert_eq!(Coord::Px(12.0).resolve(800.0, 201.0), 12.0);
    let c: Coord = serde_json::from_str("\"CENTER\"").unwrap();
    assert!(c.is_center());
    let c: Coord = serde_json::from_str("\"42\"").unwrap();
    assert_eq!(c, Coord::Px(42.0));
}

#[test]
fn with_canvas_keeps_everything_else() {
    let tpl = parse(json!({
        "name": "简约白底",
        "canvas": {"width": 800, "height": 800},
        "elements": [{"type": "title", "y": 700}]
    }))
    .unwrap();
    let adapted = tpl.with_canvas(Canvas {
        width: 720,
        height: 960,
    });
    assert_eq!(adapted.canvas.height, 960);
    assert_eq!(adapted.name, tpl.name);
    assert_eq!(adapted.elements, tpl.elements);
}
