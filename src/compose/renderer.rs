use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{RgbImage, RgbaImage};

use crate::assets::color::HexColor;
use crate::assets::font::{FontLoader, TextEngine};
use crate::collab::BackgroundGenerator;
use crate::collab::prompt::background_request;
use crate::foundation::core::Canvas;
use crate::foundation::error::{MainshotError, MainshotResult};
use crate::render::surface::{Rasterizer, Surface};
use crate::render::text::{TextPaint, TextPainter};
use crate::render::{background, contrast, product};
use crate::scene::presets::PresetCatalog;
use crate::scene::product::ProductInfo;
use crate::scene::template::{
    BackgroundKind, ElementSpec, FontWeight, PointsLayout, PriceStyle, Template, TitleStyle,
};

/// Logo width never exceeds this fraction of the canvas width.
const LOGO_MAX_WIDTH_DIVISOR: u32 = 6;
/// Gap between the logo and the bottom-right canvas corner.
const LOGO_MARGIN: i64 = 20;

/// Images and data for one render call. Everything is borrowed and left untouched.
#[derive(Clone, Copy, Debug)]
pub struct RenderInputs<'a> {
    pub product: &'a RgbaImage,
    pub info: &'a ProductInfo,
    /// Drawn at the bottom-right corner, over everything else.
    pub logo: Option<&'a RgbaImage>,
    /// Pre-fetched background for `ai` templates.
    pub background: Option<&'a RgbaImage>,
    /// Finished scene that already contains background and product.
    pub composite: Option<&'a RgbaImage>,
    /// Whether an `ai` template may call the background generator.
    pub generate: bool,
}

impl<'a> RenderInputs<'a> {
    pub fn new(product: &'a RgbaImage, info: &'a ProductInfo) -> Self {
        Self {
            product,
            info,
            logo: None,
            background: None,
            composite: None,
            generate: true,
        }
    }

    pub fn with_logo(mut self, logo: Option<&'a RgbaImage>) -> Self {
        self.logo = logo;
        self
    }

    pub fn with_background(mut self, background: Option<&'a RgbaImage>) -> Self {
        self.background = background;
        self
    }

    /// Render in composed mode on top of `composite`.
    pub fn with_composite(mut self, composite: Option<&'a RgbaImage>) -> Self {
        self.composite = composite;
        self
    }

    /// Skip background generation; `ai` templates go straight to their fallback.
    pub fn without_generation(mut self) -> Self {
        self.generate = false;
        self
    }
}

/// Final opaque image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    image: RgbImage,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Write to `path`; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> MainshotResult<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .map_err(|e| MainshotError::input(format!("write '{}': {e}", path.display())))
    }

    /// PNG bytes.
    pub fn encode_png(&self) -> MainshotResult<Vec<u8>> {
        let mut buf = std::io::Cursor::new(Vec::new());
        self.image
            .write_to(&mut buf, image::ImageFormat::Png)
            .map_err(|e| MainshotError::input(format!("encode png: {e}")))?;
        Ok(buf.into_inner())
    }
}

/// Template renderer.
///
/// Owns the text engine and rasterizer scratch state, so one renderer serves one thread. Templates
/// and inputs are only read.
pub struct Renderer {
    text: TextEngine,
    raster: Rasterizer,
    generator: Option<Arc<dyn BackgroundGenerator>>,
    catalog: Arc<PresetCatalog>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&FontLoader::from_env())
    }
}

impl Renderer {
    pub fn new(fonts: &FontLoader) -> Self {
        Self {
            text: TextEngine::new(fonts),
            raster: Rasterizer::default(),
            generator: None,
            catalog: Arc::new(PresetCatalog::builtin()),
        }
    }

    /// Generator used for `ai` backgrounds that were not supplied up front.
    pub fn with_generator(mut self, generator: Option<Arc<dyn BackgroundGenerator>>) -> Self {
        self.generator = generator;
        self
    }

    /// Catalog used to build background prompts.
    pub fn with_catalog(mut self, catalog: Arc<PresetCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Render `template` for one product.
    ///
    /// With `inputs.composite` the composite becomes the canvas: background drawing, decorations
    /// and the product element are skipped and text colors adapt to the photo underneath.
    #[tracing::instrument(skip_all, fields(template = %template.name, w = template.canvas.width, h = template.canvas.height))]
    pub fn render(
        &mut self,
        template: &Template,
        inputs: &RenderInputs<'_>,
    ) -> MainshotResult<RenderedImage> {
        template.validate()?;
        let canvas = template.canvas;
        let composed = inputs.composite.is_some();

        let mut base = match inputs.composite {
            Some(scene) => background::adopt(scene, canvas),
            None => {
                let mut base = self.background(template, inputs);
                let spec = &template.background;
                if let Some(color) = spec.overlay_color {
                    background::overlay_bands(&mut base, color.rgba())?;
                }
                if let Some(bokeh) = &spec.bokeh {
                    background::bokeh(&mut base, &mut self.raster, bokeh)?;
                }
                base
            }
        };

        // Palettes come from the scene before any text is drawn.
        let points = inputs.info.selling_points.len();
        let paints: Vec<Option<TextPaint>> = template
            .elements
            .iter()
            .map(|element| {
                if composed {
                    contrast::adapt(&base, element, points)
                } else {
                    None
                }
            })
            .collect();
        for (element, adapted) in template.elements.iter().zip(paints) {
            if composed && !element.is_text() {
                continue;
            }
            self.element(&mut base, element, inputs, adapted)?;
        }

        if let Some(logo) = inputs.logo {
            place_logo(&mut base, logo)?;
        }

        Ok(RenderedImage {
            image: base.flatten()?,
        })
    }

    fn background(&self, template: &Template, inputs: &RenderInputs<'_>) -> Surface {
        let spec = &template.background;
        let canvas = template.canvas;
        if spec.kind != BackgroundKind::Ai {
            return background::local(spec, canvas);
        }
        if let Some(image) = inputs.background {
            return background::adopt(image, canvas);
        }
        if !inputs.generate {
            return background::fallback(spec, canvas);
        }
        match self.generate(template, inputs.info) {
            Ok(image) => background::adopt(&image, canvas),
            Err(e) => {
                tracing::warn!(error = %e, "background generation failed, using fallback gradient");
                background::fallback(spec, canvas)
            }
        }
    }

    fn generate(&self, template: &Template, info: &ProductInfo) -> MainshotResult<RgbaImage> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| MainshotError::collaborator("no background generator configured"))?;
        let style = template
            .background
            .style
            .as_deref()
            .unwrap_or(self.catalog.default_style.as_str());
        generator.generate(&background_request(
            &self.catalog,
            info,
            style,
            template.canvas,
        ))
    }

    fn element(
        &mut self,
        base: &mut Surface,
        element: &ElementSpec,
        inputs: &RenderInputs<'_>,
        adapted: Option<TextPaint>,
    ) -> MainshotResult<()> {
        let canvas_h = f64::from(base.height);
        let info = inputs.info;
        match element {
            ElementSpec::ProductImage(spec) => {
                product::draw(base, &mut self.raster, inputs.product, spec)?;
            }
            ElementSpec::Title(t) => {
                let paint = adapted.unwrap_or_else(|| {
                    TextPaint::solid(t.color.rgba())
                        .with_stroke(t.stroke_color.map(HexColor::rgba), t.stroke_width)
                });
                let bold = t.font_weight == FontWeight::Bold;
                let mut painter = self.painter(base);
                match t.style {
                    TitleStyle::Plain => {
                        painter.plain(&info.name, t.x, t.y, t.font_size, bold, &paint)?;
                    }
                    TitleStyle::Banner => {
                        let banner = t.banner_color.map(HexColor::rgba);
                        painter.banner(&info.name, t.x, t.y, t.font_size, bold, banner, &paint)?;
                    }
                }
            }
            ElementSpec::Price(p) => {
                let paint = adapted.unwrap_or_else(|| {
                    TextPaint::solid(p.color.rgba())
                        .with_stroke(p.stroke_color.map(HexColor::rgba), p.stroke_width)
                });
                let text = format!("{}{}", p.prefix, info.price_text());
                let bold = p.font_weight == FontWeight::Bold;
                let mut painter = self.painter(base);
                match p.style {
                    PriceStyle::Plain => {
                        painter.plain(&text, p.x, p.y, p.font_size, bold, &paint)?;
                    }
                    PriceStyle::Badge => {
                        let colors: Vec<_> = p
                            .badge_colors
                            .as_deref()
                            .unwrap_or_default()
                            .iter()
                            .map(|c| c.rgba())
                            .collect();
                        painter.badge(&text, p.x, p.y, p.font_size, bold, &colors, &paint)?;
                    }
                }
            }
            ElementSpec::SellingPoints(s) => {
                let points = &info.selling_points;
                if points.is_empty() {
                    return Ok(());
                }
                let paint = adapted.unwrap_or_else(|| TextPaint::solid(s.color.rgba()));
                let y = s.y.resolve(canvas_h, f64::from(s.font_size));
                let chip = s.bg_color.rgba();
                let mut painter = self.painter(base);
                match s.layout {
                    PointsLayout::Plain => {
                        painter.points_line(points, s.x, s.y, s.font_size, paint.fill)?;
                    }
                    PointsLayout::Horizontal => {
                        painter.capsules(points, s.x, y, s.font_size, chip, &paint)?;
                    }
                    PointsLayout::Vertical => {
                        painter.tags(points, s.x, y, s.font_size, chip, &paint)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn painter<'s>(&'s mut self, base: &'s mut Surface) -> TextPainter<'s> {
        TextPainter {
            base,
            raster: &mut self.raster,
            engine: &mut self.text,
        }
    }
}

/// Logo size and top-left corner on `canvas`: at most a sixth of the canvas width, aspect kept,
/// 20px from the bottom-right corner. `None` when it would vanish.
pub(crate) fn logo_placement(
    logo_w: u32,
    logo_h: u32,
    canvas: Canvas,
) -> Option<(u32, u32, i64, i64)> {
    if logo_w == 0 || logo_h == 0 {
        return None;
    }
    let w = logo_w.min(canvas.width / LOGO_MAX_WIDTH_DIVISOR);
    let h = (f64::from(logo_h) * f64::from(w) / f64::from(logo_w)) as u32;
    if w == 0 || h == 0 {
        return None;
    }
    let x = i64::from(canvas.width) - i64::from(w) - LOGO_MARGIN;
    let y = i64::from(canvas.height) - i64::from(h) - LOGO_MARGIN;
    Some((w, h, x, y))
}

fn place_logo(base: &mut Surface, logo: &RgbaImage) -> MainshotResult<()> {
    let canvas = Canvas {
        width: base.width,
        height: base.height,
    };
    let Some((w, h, x, y)) = logo_placement(logo.width(), logo.height(), canvas) else {
        tracing::debug!("logo scales to nothing, skipping");
        return Ok(());
    };
    let surface = if logo.dimensions() == (w, h) {
        Surface::from_rgba(logo)
    } else {
        Surface::from_rgba(&image::imageops::resize(logo, w, h, FilterType::Lanczos3))
    };
    base.over_at(&surface, x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/renderer.rs"]
mod tests;
