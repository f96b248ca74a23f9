use super::*;

#[test]
fn sizes_snap_by_aspect_ratio() {
    let sizes = PresetCatalog::builtin().generator_sizes;
    let m = |w, h| match_size(&sizes, w, h).map(size_string);
    assert_eq!(m(800, 800).as_deref(), Some("1024*1024"));
    assert_eq!(m(1080, 1440).as_deref(), Some("768*1152"));
    assert_eq!(m(1280, 720).as_deref(), Some("1280*720"));
    assert_eq!(m(750, 352).as_deref(), Some("1280*720"));
    assert_eq!(m(720, 960).as_deref(), Some("768*1152"));
}

#[test]
fn no_sizes_means_no_match() {
    assert_eq!(match_size(&[], 800, 800), None);
    assert_eq!(match_size(&[(100, 100)], 800, 0), None);
}

#[test]
fn prompt_fills_product_name_and_appends_extras() {
    let catalog = PresetCatalog::builtin();
    let info = ProductInfo::new("跑鞋", 299.0)
        .with_scene_prompt("城市街道背景")
        .with_custom_prompt("夜景");
    let prompt = build_prompt(&catalog, &info, "promo");
    assert!(prompt.contains("适合跑鞋展示"));
    assert!(!prompt.contains("{product_name}"));
    assert!(prompt.ends_with("，城市街道背景，夜景"));
}

#[test]
fn blank_extras_are_skipped() {
    let catalog = PresetCatalog::builtin();
    let info = ProductInfo::new("杯子", 19.9).with_scene_prompt("  ");
    let prompt = build_prompt(&catalog, &info, "fresh");
    assert!(!prompt.ends_with('，'));
    assert!(prompt.starts_with("清新自然背景"));
}

#[test]
fn ai_and_unknown_styles_resolve_to_known_prompts() {
    let catalog = PresetCatalog::builtin();
    let info = ProductInfo::new("灯", 1.0);
    assert_eq!(
        build_prompt(&catalog, &info, "ai_premium"),
        build_prompt(&catalog, &info, "premium")
    );
    assert_eq!(
        build_prompt(&catalog, &info, "no-such-style"),
        build_prompt(&catalog, &info, "minimal")
    );
}

#[test]
fn request_keeps_canvas_size_and_native_size_apart() {
    let catalog = PresetCatalog::builtin();
    let info = ProductInfo::new("包", 99.0);
    let req = background_request(&catalog, &info, "promo", Canvas::new(800, 800).unwrap());
    assert_eq!((req.width, req.height), (800, 800));
    assert_eq!(req.size, "1024*1024");
    assert_eq!(req.negative_prompt, "文字,水印,logo,人物,产品,商品");
    assert!(req.reference.is_none());
}
