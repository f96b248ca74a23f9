use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{MainshotError, MainshotResult};

/// Target marketplace and its main-image geometry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub key: String,
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub title_max_chars: u32,
    pub style_hint: String,
}

impl Platform {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// One ready-made scene description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePreset {
    pub label: String,
    pub prompt: String,
}

/// Scene presets for one product category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCategory {
    pub category: String,
    pub scenes: Vec<ScenePreset>,
}

/// Immutable preset tables injected into template selection and prompt building.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetCatalog {
    pub platforms: Vec<Platform>,
    /// Style key to template-name keyword.
    pub style_keywords: BTreeMap<String, String>,
    /// Style key to background prompt; `{product_name}` is substituted.
    pub style_prompts: BTreeMap<String, String>,
    /// Style whose prompt is used for unknown styles.
    pub default_style: String,
    pub negative_prompt: String,
    pub scene_categories: Vec<SceneCategory>,
    /// Sizes the background generator accepts.
    pub generator_sizes: Vec<(u32, u32)>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetCatalog {
    /// Parse a full catalog from JSON.
    pub fn from_reader(reader: impl Read) -> MainshotResult<Self> {
        let catalog: Self = serde_json::from_reader(reader)
            .map_err(|e| MainshotError::serde(format!("preset catalog json: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> MainshotResult<()> {
        for p in &self.platforms {
            p.canvas()
                .validate()
                .map_err(|e| MainshotError::validation(format!("platform '{}': {e}", p.key)))?;
        }
        if self.generator_sizes.iter().any(|&(w, h)| w == 0 || h == 0) {
            return Err(MainshotError::validation("generator sizes must be > 0"));
        }
        Ok(())
    }

    /// Look up a platform by key.
    pub fn platform(&self, key: &str) -> MainshotResult<&Platform> {
        self.platforms
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| MainshotError::validation(format!("unknown platform '{key}'")))
    }

    /// Template-name keyword for a style; unmapped styles are their own keyword.
    pub fn style_keyword<'a>(&'a self, style: &'a str) -> &'a str {
        self.style_keywords
            .get(style)
            .map(String::as_str)
            .unwrap_or(style)
    }

    /// Background prompt template for a style. `ai_*` styles share their base style's prompt;
    /// unknown styles use [`PresetCatalog::default_style`].
    pub fn style_prompt(&self, style: &str) -> &str {
        let base = style.strip_prefix("ai_").unwrap_or(style);
        self.style_prompts
            .get(base)
            .or_else(|| self.style_prompts.get(&self.default_style))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Scenes of one category.
    pub fn scenes(&self, category: &str) -> Option<&[ScenePreset]> {
        self.scene_categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.scenes.as_slice())
    }

    /// Built-in Chinese marketplace presets.
    pub fn builtin() -> Self {
        fn platform(
            key: &str,
            label: &str,
            (width, height): (u32, u32),
            title_max_chars: u32,
            style_hint: &str,
        ) -> Platform {
            Platform {
                key: key.to_owned(),
                label: label.to_owned(),
                width,
                height,
                title_max_chars,
                style_hint: style_hint.to_owned(),
            }
        }

        fn category(name: &str, scenes: &[(&str, &str)]) -> SceneCategory {
            SceneCategory {
                category: name.to_owned(),
                scenes: scenes
                    .iter()
                    .map(|(label, prompt)| ScenePreset {
                        label: (*label).to_owned(),
                        prompt: (*prompt).to_owned(),
                    })
                    .collect(),
            }
        }

        fn pairs(xs: &[(&str, &str)]) -> BTreeMap<String, String> {
            xs.iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect()
        }

        Self {
            platforms: vec![
                platform("taobao", "淘宝/天猫", (800, 800), 60, "通用电商风格"),
                platform("pinduoduo", "拼多多", (750, 352), 50, "性价比、促销、低价优惠"),
                platform("douyin", "抖音电商", (720, 960), 40, "短平快、吸引点击、竖版"),
                platform("xiaohongshu", "小红书", (1080, 1440), 20, "种草风、生活化、文艺"),
            ],
            style_keywords: pairs(&[
                ("promo", "促销"),
                ("minimal", "简约"),
                ("premium", "高端"),
                ("fresh", "清新"),
                ("social", "社交"),
                ("ai_promo", "AI促销"),
                ("ai_minimal", "AI简约"),
                ("ai_premium", "AI高端"),
                ("ai_fresh", "AI清新"),
                ("ai_social", "AI社交"),
            ]),
            style_prompts: pairs(&[
                (
                    "promo",
                    "电商促销氛围背景，红色喜庆色调，动感光效粒子装饰，径向渐变光晕，高饱和度，适合{product_name}展示，无文字无水印，专业商业摄影光效，4K高清",
                ),
                (
                    "minimal",
                    "极简白色背景，柔和漫射光照明，淡灰色渐变，干净通透，适合{product_name}展示，无文字无水印，专业产品摄影，高端简洁",
                ),
                (
                    "premium",
                    "高端深色背景，深蓝黑色调，金色光效粒子点缀，奢华丝绒质感，柔和聚光灯，适合{product_name}展示，无文字无水印，专业商业摄影，高级感",
                ),
                (
                    "fresh",
                    "清新自然背景，浅绿色柔和渐变，植物叶片虚化元素，阳光斑驳效果，适合{product_name}展示，无文字无水印，自然光摄影风格",
                ),
                (
                    "social",
                    "社交媒体风格背景，粉色梦幻渐变，柔焦光斑装饰，少女心配色，适合{product_name}种草内容，无文字无水印，ins风格摄影",
                ),
            ]),
            default_style: "minimal".to_owned(),
            negative_prompt: "文字,水印,logo,人物,产品,商品".to_owned(),
            scene_categories: vec![
                category(
                    "运动鞋/运动装备",
                    &[
                        ("运动场跑道", "专业运动场跑道背景，动感模糊光线，速度感"),
                        ("户外山野", "户外山野小径背景，阳光穿透树林，自然清新"),
                        ("健身房", "现代健身房背景，金属质感器械虚化，专业运动氛围"),
                        ("城市街拍", "城市街道背景，霓虹灯光虚化，潮流街头风"),
                    ],
                ),
                category(
                    "数码/电子产品",
                    &[
                        ("科技深空", "深蓝色科技背景，光粒子效果，未来感"),
                        ("极简桌面", "极简工作桌面背景，浅灰大理石纹理，柔和侧光"),
                        ("渐变光效", "深色渐变背景，蓝紫色科技光效，霓虹光线"),
                        ("白色展台", "纯白色产品展台背景，柔和环境光，商业摄影"),
                    ],
                ),
                category(
                    "美妆/护肤",
                    &[
                        ("花瓣水滴", "粉色花瓣散落背景，晶莹水滴，柔焦梦幻"),
                        ("大理石台面", "白色大理石台面背景，金色点缀，高级质感"),
                        ("自然植物", "绿色植物叶片背景，露水光泽，天然有机感"),
                        ("丝绸质感", "丝绸织物褶皱背景，柔和光影，奢华高级"),
                    ],
                ),
                category(
                    "食品/饮品",
                    &[
                        ("木质餐桌", "温暖木质餐桌背景，自然光照射，家庭温馨感"),
                        ("深色美食", "深色调美食摄影背景，侧光打亮，高级餐厅氛围"),
                        ("田园清新", "绿色田园背景，阳光洒落，有机天然"),
                        ("纯色极简", "纯色极简背景，柔和漫射光，干净通透"),
                    ],
                ),
                category(
                    "服装/配饰",
                    &[
                        ("时尚秀场", "时尚秀场T台背景，聚光灯效果，高级时装氛围"),
                        ("街头潮流", "涂鸦墙壁背景，城市街头风，潮流年轻"),
                        ("自然户外", "户外自然风光背景，柔和日落光线，文艺气息"),
                        ("纯白影棚", "专业影棚白色背景，柔光箱照明，商业级"),
                    ],
                ),
                category(
                    "家居/生活",
                    &[
                        ("温馨客厅", "温馨客厅场景背景，柔和灯光，居家生活感"),
                        ("北欧极简", "北欧极简家居背景，白色空间，自然采光"),
                        ("日式和风", "日式和风背景，竹子元素，禅意宁静"),
                        ("绿植花艺", "室内绿植花艺背景，阳光窗台，生活美学"),
                    ],
                ),
            ],
            generator_sizes: vec![(1024, 1024), (720, 1280), (1280, 720), (768, 1152)],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/presets.rs"]
mod tests;
