use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::color::HexColor;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{MainshotError, MainshotResult};

/// Declarative description of one marketing image: canvas, background and ordered elements.
///
/// Elements are drawn in declaration order; later elements cover earlier ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Display name; style selection matches keywords against it.
    #[serde(default)]
    pub name: String,
    /// Platform key this template was designed for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Output size. Required.
    pub canvas: Canvas,
    /// Background treatment.
    #[serde(default)]
    pub background: BackgroundSpec,
    /// Elements in render order.
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
    /// Identifier of the record this template was loaded from (file name for directory stores).
    #[serde(skip)]
    pub source: Option<String>,
}

impl Template {
    /// Parse and validate a template from JSON.
    pub fn from_reader(reader: impl Read) -> MainshotResult<Self> {
        let tpl: Self = serde_json::from_reader(reader)
            .map_err(|e| MainshotError::serde(format!("template json: {e}")))?;
        tpl.validate()?;
        Ok(tpl)
    }

    /// Parse a JSON string, see [`Template::from_reader`].
    pub fn from_json_str(s: &str) -> MainshotResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Load a template file; its file name becomes [`Template::source`].
    pub fn from_path(path: impl AsRef<Path>) -> MainshotResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            MainshotError::input(format!("open template '{}': {e}", path.display()))
        })?;
        let mut tpl = Self::from_reader(std::io::BufReader::new(file)).map_err(|e| match e {
            MainshotError::Serde(msg) => {
                MainshotError::serde(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        tpl.source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        Ok(tpl)
    }

    /// Reject templates that cannot be rendered.
    pub fn validate(&self) -> MainshotResult<()> {
        self.canvas.validate()?;
        for (i, el) in self.elements.iter().enumerate() {
            el.validate()
                .map_err(|e| MainshotError::validation(format!("elements[{i}]: {e}")))?;
        }
        if let Some(bokeh) = &self.background.bokeh
            && bokeh.count > BokehSpec::MAX_COUNT
        {
            return Err(MainshotError::validation(format!(
                "background.bokeh.count must be <= {}",
                BokehSpec::MAX_COUNT
            )));
        }
        Ok(())
    }

    /// Copy with the canvas replaced; every other directive is reused as-is.
    pub fn with_canvas(&self, canvas: Canvas) -> Self {
        Self {
            canvas,
            ..self.clone()
        }
    }
}

/// Background source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    /// Flat fill with the first color.
    #[default]
    Solid,
    /// Vertical blend between the first two colors.
    Gradient,
    /// Externally generated scene.
    Ai,
}

/// Background treatment plus decorations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSpec {
    /// Background source.
    #[serde(rename = "type", default)]
    pub kind: BackgroundKind,
    /// Fill colors, top first.
    #[serde(default = "default_background_colors")]
    pub colors: Vec<HexColor>,
    /// Color of the top and bottom legibility bands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_color: Option<HexColor>,
    /// Procedural bokeh decoration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bokeh: Option<BokehSpec>,
    /// Colors used when external generation fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_colors: Option<Vec<HexColor>>,
    /// Style key handed to the background generator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self {
            kind: BackgroundKind::Solid,
            colors: default_background_colors(),
            overlay_color: None,
            bokeh: None,
            fallback_colors: None,
            style: None,
        }
    }
}

fn default_background_colors() -> Vec<HexColor> {
    vec![HexColor(Rgba8::WHITE)]
}

/// Seeded bokeh decoration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BokehSpec {
    /// Circle color; per-circle alpha replaces its alpha.
    #[serde(default = "white")]
    pub color: HexColor,
    /// Number of circles.
    #[serde(default = "default_bokeh_count")]
    pub count: u32,
    /// Layout seed.
    #[serde(default)]
    pub seed: u64,
}

impl BokehSpec {
    /// Largest accepted `count`.
    pub const MAX_COUNT: u32 = 500;
}

fn default_bokeh_count() -> u32 {
    30
}

/// Horizontal or vertical position: pixels, or centered on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coord {
    /// Absolute pixel offset from the left/top edge.
    Px(f64),
    /// Centered on the canvas axis.
    Center,
}

impl Default for Coord {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl Coord {
    /// Resolve to a pixel offset for content `size` on an axis of length `axis`.
    pub fn resolve(self, axis: f64, size: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Center => ((axis - size) / 2.0).floor(),
        }
    }

    /// Whether the coordinate is centered.
    pub fn is_center(self) -> bool {
        matches!(self, Self::Center)
    }
}

impl Serialize for Coord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Px(v) => serializer.serialize_f64(*v),
            Self::Center => serializer.serialize_str("center"),
        }
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Num(v) if v.is_finite() => Self::Px(v),
            Repr::Num(_) => Self::Px(0.0),
            Repr::Str(s) if s.trim().eq_ignore_ascii_case("center") => Self::Center,
            Repr::Str(s) => Self::Px(s.trim().parse::<f64>().unwrap_or(0.0)),
        })
    }
}

/// Font weight request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// Bold weight.
    Bold,
    /// Regular weight.
    #[default]
    #[serde(other)]
    Normal,
}

/// Title treatment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStyle {
    /// Text on a translucent rounded banner.
    Banner,
    /// Text with shadow.
    #[default]
    #[serde(other)]
    Plain,
}

/// Price treatment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceStyle {
    /// Text inside a gradient pill.
    Badge,
    /// Text with shadow.
    #[default]
    #[serde(other)]
    Plain,
}

/// Selling-point arrangement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointsLayout {
    /// One joined line without chips.
    Plain,
    /// Wrapping row of capsules.
    Horizontal,
    /// One chip per row.
    #[default]
    #[serde(other)]
    Vertical,
}

/// Product photo placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductImageSpec {
    /// Maximum width as a percentage of the canvas width.
    #[serde(default = "default_max_width_pct")]
    pub max_width_pct: f64,
    /// Maximum height as a percentage of the canvas height.
    #[serde(default = "default_max_height_pct")]
    pub max_height_pct: f64,
    /// Soft radial glow drawn behind the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow_color: Option<HexColor>,
}

impl Default for ProductImageSpec {
    fn default() -> Self {
        Self {
            max_width_pct: default_max_width_pct(),
            max_height_pct: default_max_height_pct(),
            glow_color: None,
        }
    }
}

fn default_max_width_pct() -> f64 {
    60.0
}

fn default_max_height_pct() -> f64 {
    55.0
}

/// Product name line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TitleSpec {
    #[serde(default)]
    pub x: Coord,
    #[serde(default)]
    pub y: Coord,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "black")]
    pub color: HexColor,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub style: TitleStyle,
    /// Banner fill; translucent black when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_color: Option<HexColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<HexColor>,
    #[serde(default)]
    pub stroke_width: f32,
}

/// Price line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSpec {
    #[serde(default)]
    pub x: Coord,
    #[serde(default)]
    pub y: Coord,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "black")]
    pub color: HexColor,
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Text placed before the amount.
    #[serde(default = "default_price_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub style: PriceStyle,
    /// Pill gradient, top first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_colors: Option<Vec<HexColor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<HexColor>,
    #[serde(default)]
    pub stroke_width: f32,
}

/// Selling-point tags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SellingPointsSpec {
    #[serde(default)]
    pub x: Coord,
    #[serde(default)]
    pub y: Coord,
    #[serde(default = "default_points_font_size")]
    pub font_size: f32,
    #[serde(default = "white")]
    pub color: HexColor,
    /// Chip fill.
    #[serde(default = "default_points_bg")]
    pub bg_color: HexColor,
    #[serde(default)]
    pub layout: PointsLayout,
}

/// One visual unit of a template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementSpec {
    /// The product photo.
    ProductImage(ProductImageSpec),
    /// Product name.
    Title(TitleSpec),
    /// Price text or badge.
    Price(PriceSpec),
    /// Selling-point tags.
    SellingPoints(SellingPointsSpec),
}

impl ElementSpec {
    /// Whether the element draws text.
    pub fn is_text(&self) -> bool {
        !matches!(self, Self::ProductImage(_))
    }

    fn validate(&self) -> MainshotResult<()> {
        fn font(size: f32) -> MainshotResult<()> {
            if !size.is_finite() || size <= 0.0 {
                return Err(MainshotError::validation("font_size must be finite and > 0"));
            }
            Ok(())
        }
        match self {
            Self::ProductImage(p) => {
                for pct in [p.max_width_pct, p.max_height_pct] {
                    if !(pct > 0.0 && pct <= 100.0) {
                        return Err(MainshotError::validation(
                            "max_width_pct/max_height_pct must be in (0, 100]",
                        ));
                    }
                }
                Ok(())
            }
            Self::Title(t) => font(t.font_size),
            Self::Price(p) => font(p.font_size),
            Self::SellingPoints(s) => font(s.font_size),
        }
    }
}

fn default_font_size() -> f32 {
    28.0
}

fn default_points_font_size() -> f32 {
    18.0
}

fn default_price_prefix() -> String {
    "¥".to_owned()
}

fn default_points_bg() -> HexColor {
    HexColor(Rgba8::rgba(0xFF, 0x00, 0x00, 0xCC))
}

fn black() -> HexColor {
    HexColor(Rgba8::BLACK)
}

fn white() -> HexColor {
    HexColor(Rgba8::WHITE)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/template.rs"]
mod tests;
