use image::RgbaImage;

use crate::collab::{BackgroundGenerator, BackgroundRequest};
use crate::foundation::error::{MainshotError, MainshotResult};
use crate::render::background::adopt;
use crate::render::product::{Placement, fit, scaled};
use crate::render::surface::Surface;
use crate::scene::template::{ElementSpec, ProductImageSpec, Template};

/// Builds a finished scene (background plus product) through a [`BackgroundGenerator`].
///
/// The product is handed to the generator already placed where the template puts it; the
/// original product pixels are pasted back over the result so the generator can never alter them.
pub struct SceneCompositor<'a> {
    generator: &'a dyn BackgroundGenerator,
}

impl<'a> SceneCompositor<'a> {
    pub fn new(generator: &'a dyn BackgroundGenerator) -> Self {
        Self { generator }
    }

    /// Composite image at the template's canvas size, ready to render in composed mode.
    #[tracing::instrument(skip_all, fields(template = %template.name))]
    pub fn compose(
        &self,
        template: &Template,
        product: &RgbaImage,
        request: BackgroundRequest,
    ) -> MainshotResult<RgbaImage> {
        let canvas = template.canvas;
        let placement = product_placement(template, product)?;
        let cutout = scaled(product, placement);

        let mut reference = Surface::new(canvas.width, canvas.height);
        reference.over_at(&cutout, placement.x, placement.y)?;
        let request = BackgroundRequest {
            width: canvas.width,
            height: canvas.height,
            reference: Some(reference.to_rgba_image()?),
            ..request
        };

        let generated = self.generator.generate(&request)?;
        let mut scene = adopt(&generated, canvas);
        scene.over_at(&cutout, placement.x, placement.y)?;
        scene.to_rgba_image()
    }
}

/// Where the template's first product element puts the product; default bounds otherwise.
pub(crate) fn product_placement(
    template: &Template,
    product: &RgbaImage,
) -> MainshotResult<Placement> {
    let default_spec = ProductImageSpec::default();
    let spec = template
        .elements
        .iter()
        .find_map(|el| match el {
            ElementSpec::ProductImage(p) => Some(p),
            _ => None,
        })
        .unwrap_or(&default_spec);
    fit(product.width(), product.height(), template.canvas, spec)
        .ok_or_else(|| MainshotError::input("product image is empty"))
}

#[cfg(test)]
#[path = "../../tests/unit/collab/scene.rs"]
mod tests;
