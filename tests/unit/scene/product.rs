use super::*;

#[test]
fn price_formatting() {
    assert_eq!(format_price(299.0), "299");
    assert_eq!(format_price(99.9), "99.9");
    assert_eq!(format_price(0.0), "0");
    assert_eq!(format_price(-5.0), "-5");
}

#[test]
fn product_info_json_defaults() {
    let info = ProductInfo::from_reader(r#"{"name": "运动鞋", "price": 299}"#.as_bytes()).unwrap();
    assert_eq!(info.name, "运动鞋");
    assert!(info.selling_points.is_empty());
    assert_eq!(info.price_text(), "299");
    assert!(info.scene_prompt.is_none());

    assert!(matches!(
        ProductInfo::from_reader("[]".as_bytes()),
        Err(MainshotError::Serde(_))
    ));
}

#[test]
fn builders_keep_point_order_and_duplicates() {
    let info = ProductInfo::new("杯子", 19.9).with_selling_points(["保温", "轻便", "保温"]);
    assert_eq!(info.selling_points, ["保温", "轻便", "保温"]);
}
