use std::collections::HashSet;

use super::*;

#[test]
fn builtin_platforms() {
    let c = PresetCatalog::builtin();
    let sizes: Vec<(&str, u32, u32, u32)> = c
        .platforms
        .iter()
        .map(|p| (p.key.as_str(), p.width, p.height, p.title_max_chars))
        .collect();
    assert_eq!(
        sizes,
        [
            ("taobao", 800, 800, 60),
            ("pinduoduo", 750, 352, 50),
            ("douyin", 720, 960, 40),
            ("xiaohongshu", 1080, 1440, 20),
        ]
    );
    assert_eq!(c.platform("douyin").unwrap().canvas().height, 960);
    assert!(matches!(
        c.platform("amazon"),
        Err(MainshotError::Validation(_))
    ));
}

#[test]
fn style_keywords_and_prompts() {
    let c = PresetCatalog::builtin();
    assert_eq!(c.style_keyword("promo"), "促销");
    assert_eq!(c.style_keyword("ai_fresh"), "AI清新");
    assert_eq!(c.style_keyword("节日"), "节日");

    for style in ["promo", "minimal", "premium", "fresh", "social"] {
        assert!(c.style_prompt(style).contains("{product_name}"), "{style}");
    }
    assert_eq!(c.style_prompt("ai_premium"), c.style_prompt("premium"));
    assert_eq!(c.style_prompt("vaporwave"), c.style_prompt("minimal"));
}

#[test]
fn scene_presets_have_unique_labels() {
    let c = PresetCatalog::builtin();
    assert_eq!(c.scene_categories.len(), 6);
    for cat in &c.scene_categories {
        assert!(cat.scenes.len() >= 3, "{}", cat.category);
        let labels: HashSet<&str> = cat.scenes.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels.len(), cat.scenes.len());
        assert!(cat.scenes.iter().all(|s| !s.prompt.is_empty()));
    }
    assert!(c.scenes("美妆/护肤").is_some());
    assert!(c.scenes("汽车").is_none());
}

#[test]
fn catalog_round_trips_through_json_and_validates() {
    let c = PresetCatalog::builtin();
    let json = serde_json::to_string(&c).unwrap();
    let back = PresetCatalog::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, c);

    let mut bad = c.clone();
    bad.platforms[0].width = 0;
    let json = serde_json::to_string(&bad).unwrap();
    assert!(matches!(
        PresetCatalog::from_reader(json.as_bytes()),
        Err(MainshotError::Validation(_))
    ));
}
