use std::sync::Arc;

use image::{DynamicImage, RgbaImage};

use crate::assets::font::FontLoader;
use crate::collab::prompt::background_request;
use crate::collab::remover::PassthroughRemover;
use crate::collab::scene::SceneCompositor;
use crate::collab::{BackgroundGenerator, BackgroundRemover};
use crate::compose::renderer::{RenderInputs, RenderedImage, Renderer};
use crate::compose::select::select_template;
use crate::foundation::error::MainshotResult;
use crate::scene::presets::PresetCatalog;
use crate::scene::product::ProductInfo;
use crate::scene::store::TemplateStore;
use crate::scene::template::{BackgroundKind, Template};

/// Options for [`Composer`].
#[derive(Clone, Debug, Default)]
pub struct ComposerOpts {
    pub(crate) skip_bg_removal: bool,
    pub(crate) scene_compose: bool,
    pub(crate) ai_background: Option<RgbaImage>,
}

impl ComposerOpts {
    /// Use the product as given; it already has a transparent background.
    pub fn with_skip_bg_removal(mut self, skip: bool) -> Self {
        self.skip_bg_removal = skip;
        self
    }

    /// For `ai` templates, let the generator build the whole scene around the placed product and
    /// render in composed mode. Failures fall back to a normal render.
    pub fn with_scene_compose(mut self, enabled: bool) -> Self {
        self.scene_compose = enabled;
        self
    }

    /// Background handed to every `ai` template instead of generating one.
    pub fn with_ai_background(mut self, background: Option<RgbaImage>) -> Self {
        self.ai_background = background;
        self
    }
}

/// Renders one product for several platforms.
pub struct Composer {
    store: Arc<dyn TemplateStore>,
    catalog: Arc<PresetCatalog>,
    remover: Arc<dyn BackgroundRemover>,
    generator: Option<Arc<dyn BackgroundGenerator>>,
    fonts: FontLoader,
    opts: ComposerOpts,
}

impl Composer {
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Self {
            store,
            catalog: Arc::new(PresetCatalog::builtin()),
            remover: Arc::new(PassthroughRemover),
            generator: None,
            fonts: FontLoader::from_env(),
            opts: ComposerOpts::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: PresetCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn with_remover(mut self, remover: Arc<dyn BackgroundRemover>) -> Self {
        self.remover = remover;
        self
    }

    pub fn with_generator(mut self, generator: Option<Arc<dyn BackgroundGenerator>>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_fonts(mut self, fonts: FontLoader) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn with_opts(mut self, opts: ComposerOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// Template that would be used for `(platform, style)`.
    pub fn template_for(&self, platform: &str, style: &str) -> MainshotResult<Template> {
        let templates = self.store.list()?;
        let (template, how) = select_template(&templates, &self.catalog, platform, style)?;
        tracing::debug!(platform, style, template = %template.name, ?how, "template selected");
        Ok(template)
    }

    /// One image per platform, in the order given.
    ///
    /// The background is removed once up front. Template selection and every render share that
    /// cut-out; collaborator failures degrade per render and never abort the batch.
    #[tracing::instrument(skip_all, fields(platforms = ?platforms, style))]
    pub fn compose_platforms(
        &self,
        product: &DynamicImage,
        info: &ProductInfo,
        platforms: &[String],
        style: &str,
        logo: Option<&RgbaImage>,
    ) -> MainshotResult<Vec<(String, RenderedImage)>> {
        let cutout = if self.opts.skip_bg_removal {
            product.to_rgba8()
        } else {
            self.remover.remove(product)?
        };

        let templates = self.store.list()?;
        let mut renderer = Renderer::new(&self.fonts)
            .with_generator(self.generator.clone())
            .with_catalog(Arc::clone(&self.catalog));

        let mut out = Vec::with_capacity(platforms.len());
        for platform in platforms {
            let (template, how) = select_template(&templates, &self.catalog, platform, style)?;
            tracing::debug!(%platform, template = %template.name, ?how, "template selected");

            let scene = self.scene(&template, &cutout, info);
            let mut inputs = RenderInputs::new(&cutout, info)
                .with_logo(logo)
                .with_background(self.opts.ai_background.as_ref())
                .with_composite(scene.as_ref());
            if scene.is_none() && self.scene_attempted(&template) {
                inputs = inputs.without_generation();
            }
            out.push((platform.clone(), renderer.render(&template, &inputs)?));
        }
        Ok(out)
    }

    fn scene_attempted(&self, template: &Template) -> bool {
        self.opts.scene_compose
            && self.opts.ai_background.is_none()
            && self.generator.is_some()
            && template.background.kind == BackgroundKind::Ai
    }

    /// Generated composite for `ai` templates when scene composition is on.
    fn scene(&self, template: &Template, product: &RgbaImage, info: &ProductInfo) -> Option<RgbaImage> {
        if !self.scene_attempted(template) {
            return None;
        }
        let generator = self.generator.as_deref()?;
        let style = template
            .background
            .style
            .as_deref()
            .unwrap_or(self.catalog.default_style.as_str());
        let request = background_request(&self.catalog, info, style, template.canvas);
        match SceneCompositor::new(generator).compose(template, product, request) {
            Ok(scene) => Some(scene),
            Err(e) => {
                tracing::warn!(error = %e, "scene generation failed, rendering fallback background");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/composer.rs"]
mod tests;
