use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::MainshotResult;
use crate::render::surface::{Rasterizer, Surface, fill_shape};
use crate::scene::template::ProductImageSpec;

const GLOW_RINGS: u32 = 20;
const GLOW_BLUR_SIGMA: f32 = 25.0;
const SHADOW_ALPHA: u8 = 70;
const SHADOW_BLUR_SIGMA: f32 = 10.0;

/// Where and how large the product lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Placement {
    pub(crate) fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + f64::from(self.width) / 2.0,
            self.y as f64 + f64::from(self.height) / 2.0,
        )
    }
}

/// Aspect-preserving fit into the percentage box, centered on both axes.
/// Percentages above 100 are treated as 100.
///
/// `None` when the result would be empty.
pub(crate) fn fit(
    src_width: u32,
    src_height: u32,
    canvas: Canvas,
    spec: &ProductImageSpec,
) -> Option<Placement> {
    if src_width == 0 || src_height == 0 {
        return None;
    }
    let max_w = (f64::from(canvas.width) * spec.max_width_pct.min(100.0) / 100.0).floor();
    let max_h = (f64::from(canvas.height) * spec.max_height_pct.min(100.0) / 100.0).floor();
    let ratio = (max_w / f64::from(src_width)).min(max_h / f64::from(src_height));
    if !ratio.is_finite() || ratio <= 0.0 {
        return None;
    }
    let width = (f64::from(src_width) * ratio).floor() as u32;
    let height = (f64::from(src_height) * ratio).floor() as u32;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Placement {
        x: (i64::from(canvas.width) - i64::from(width)).div_euclid(2),
        y: (i64::from(canvas.height) - i64::from(height)).div_euclid(2),
        width,
        height,
    })
}

/// Product pixels scaled to `placement`, premultiplied.
pub(crate) fn scaled(product: &RgbaImage, placement: Placement) -> Surface {
    if product.dimensions() == (placement.width, placement.height) {
        return Surface::from_rgba(product);
    }
    let resized = image::imageops::resize(
        product,
        placement.width,
        placement.height,
        FilterType::Lanczos3,
    );
    Surface::from_rgba(&resized)
}

/// Concentric ellipses around the product, fading outward, then heavily blurred.
pub(crate) fn glow(
    base: &mut Surface,
    raster: &mut Rasterizer,
    placement: Placement,
    color: Rgba8,
) -> MainshotResult<()> {
    let (cx, cy) = placement.center();
    let rx = f64::from(placement.width) / 2.0;
    let ry = f64::from(placement.height) / 2.0;
    let peak = f64::from(color.a);

    let mut layer = raster.layer(base.width, base.height, |ctx| {
        for i in 0..GLOW_RINGS {
            let t = f64::from(i) / f64::from(GLOW_RINGS);
            let scale = 0.5 + 0.8 * t;
            let alpha = (peak * 0.12 * (1.0 - t)).round().clamp(0.0, 255.0) as u8;
            if alpha == 0 {
                continue;
            }
            let ellipse = kurbo::Ellipse::new((cx, cy), (rx * scale, ry * scale), 0.0);
            fill_shape(ctx, &ellipse, color.with_alpha(alpha));
        }
    })?;
    layer.blur(GLOW_BLUR_SIGMA)?;
    base.over(&layer)
}

/// Soft ellipse under the bottom edge of the product footprint.
pub(crate) fn shadow(
    base: &mut Surface,
    raster: &mut Rasterizer,
    placement: Placement,
) -> MainshotResult<()> {
    let (cx, _) = placement.center();
    let w = f64::from(placement.width);
    let h = f64::from(placement.height);
    let bottom = placement.y as f64 + h;
    let ry = (h * 0.05).max(4.0);

    let mut layer = raster.layer(base.width, base.height, |ctx| {
        let ellipse = kurbo::Ellipse::new((cx, bottom - ry * 0.5), (w * 0.4, ry), 0.0);
        fill_shape(ctx, &ellipse, Rgba8::BLACK.with_alpha(SHADOW_ALPHA));
    })?;
    layer.blur(SHADOW_BLUR_SIGMA)?;
    base.over(&layer)
}

/// Glow (optional), shadow, then the product pixels honoring their alpha.
pub(crate) fn draw(
    base: &mut Surface,
    raster: &mut Rasterizer,
    product: &RgbaImage,
    spec: &ProductImageSpec,
) -> MainshotResult<Option<Placement>> {
    let canvas = Canvas {
        width: base.width,
        height: base.height,
    };
    let Some(placement) = fit(product.width(), product.height(), canvas, spec) else {
        tracing::debug!("product image scales to nothing, skipping");
        return Ok(None);
    };

    if let Some(glow_color) = spec.glow_color {
        glow(base, raster, placement, glow_color.rgba())?;
    }
    shadow(base, raster, placement)?;
    base.over_at(&scaled(product, placement), placement.x, placement.y)?;
    Ok(Some(placement))
}

#[cfg(test)]
#[path = "../../tests/unit/render/product.rs"]
mod tests;
