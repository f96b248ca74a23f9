use image::RgbaImage;
use image::imageops::FilterType;

use crate::assets::color::lerp_gradient;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::MainshotResult;
use crate::foundation::math::SeededRng;
use crate::render::surface::{Rasterizer, Surface, fill_shape};
use crate::scene::template::{BackgroundKind, BackgroundSpec, BokehSpec};

/// Peak alpha of the legibility bands at the canvas edge.
pub(crate) const BAND_MAX_ALPHA: u8 = 160;
/// Bokeh circle radius range in pixels.
pub(crate) const BOKEH_RADIUS: (u32, u32) = (8, 40);
/// Bokeh circle alpha range.
pub(crate) const BOKEH_ALPHA: (u32, u32) = (20, 60);
/// Blur applied to the whole bokeh layer.
pub(crate) const BOKEH_BLUR_SIGMA: f32 = 6.0;

const FALLBACK_TOP: Rgba8 = Rgba8::WHITE;
const FALLBACK_BOTTOM: Rgba8 = Rgba8::rgb(0xF0, 0xF0, 0xF0);

/// Opaque single-color canvas.
pub(crate) fn solid(canvas: Canvas, color: Rgba8) -> Surface {
    Surface::filled(canvas.width, canvas.height, color.with_alpha(255))
}

/// Opaque top-to-bottom linear blend.
pub(crate) fn gradient(canvas: Canvas, top: Rgba8, bottom: Rgba8) -> Surface {
    let rows = lerp_gradient(top.with_alpha(255), bottom.with_alpha(255), canvas.height);
    Surface::from_rows(canvas.width, &rows)
}

/// Background drawn purely from the template colors.
///
/// `solid` uses the first color; `gradient` needs two colors and degrades to a solid fill with
/// one. No colors at all means white. An `ai` background reaching this path renders its fallback.
pub(crate) fn local(spec: &BackgroundSpec, canvas: Canvas) -> Surface {
    let colors: Vec<Rgba8> = spec.colors.iter().map(|c| c.rgba()).collect();
    match spec.kind {
        BackgroundKind::Ai => fallback(spec, canvas),
        BackgroundKind::Gradient if colors.len() >= 2 => gradient(canvas, colors[0], colors[1]),
        BackgroundKind::Solid | BackgroundKind::Gradient => {
            solid(canvas, colors.first().copied().unwrap_or(Rgba8::WHITE))
        }
    }
}

/// Gradient used when an external background cannot be obtained.
pub(crate) fn fallback(spec: &BackgroundSpec, canvas: Canvas) -> Surface {
    let colors: Vec<Rgba8> = spec
        .fallback_colors
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| c.rgba())
        .collect();
    match colors.as_slice() {
        [] => gradient(canvas, FALLBACK_TOP, FALLBACK_BOTTOM),
        [only] => solid(canvas, *only),
        [top, bottom, ..] => gradient(canvas, *top, *bottom),
    }
}

/// Stretch an externally produced image to the canvas and adopt it as an opaque base.
pub(crate) fn adopt(image: &RgbaImage, canvas: Canvas) -> Surface {
    let mut opaque = if image.dimensions() == (canvas.width, canvas.height) {
        image.clone()
    } else {
        image::imageops::resize(image, canvas.width, canvas.height, FilterType::Lanczos3)
    };
    for px in opaque.pixels_mut() {
        px.0[3] = 255;
    }
    Surface::from_rgba(&opaque)
}

/// Alpha of row `y` in a band `band` rows tall, peaking at the outer edge.
pub(crate) fn band_alpha(y_from_edge: u32, band: u32) -> u8 {
    if band == 0 || y_from_edge >= band {
        return 0;
    }
    let t = 1.0 - f64::from(y_from_edge) / f64::from(band);
    (f64::from(BAND_MAX_ALPHA) * t).round() as u8
}

/// Top and bottom quarter bands fading from `color` at the edges to nothing.
pub(crate) fn overlay_bands(base: &mut Surface, color: Rgba8) -> MainshotResult<()> {
    let band = base.height / 4;
    let mut rows = vec![Rgba8::rgba(0, 0, 0, 0); base.height as usize];
    for i in 0..band {
        let c = color.with_alpha(band_alpha(i, band));
        rows[i as usize] = c;
        rows[(base.height - 1 - i) as usize] = c;
    }
    let layer = Surface::from_rows(base.width, &rows);
    base.over(&layer)
}

/// One decorative bokeh circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BokehDot {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) radius: u32,
    pub(crate) alpha: u8,
}

/// Circle layout derived only from the seed and canvas size, at most
/// [`BokehSpec::MAX_COUNT`] circles.
pub(crate) fn bokeh_dots(spec: &BokehSpec, canvas: Canvas) -> Vec<BokehDot> {
    let mut rng = SeededRng::new(spec.seed);
    (0..spec.count.min(BokehSpec::MAX_COUNT))
        .map(|_| BokehDot {
            x: rng.range_inclusive(0, canvas.width.saturating_sub(1)),
            y: rng.range_inclusive(0, canvas.height.saturating_sub(1)),
            radius: rng.range_inclusive(BOKEH_RADIUS.0, BOKEH_RADIUS.1),
            alpha: rng.range_inclusive(BOKEH_ALPHA.0, BOKEH_ALPHA.1) as u8,
        })
        .collect()
}

/// Blurred translucent circles over the base.
pub(crate) fn bokeh(
    base: &mut Surface,
    raster: &mut Rasterizer,
    spec: &BokehSpec,
) -> MainshotResult<()> {
    let canvas = Canvas {
        width: base.width,
        height: base.height,
    };
    let dots = bokeh_dots(spec, canvas);
    if dots.is_empty() {
        return Ok(());
    }
    let color = spec.color.rgba();
    let mut layer = raster.layer(base.width, base.height, |ctx| {
        for d in &dots {
            let circle = kurbo::Circle::new(
                (f64::from(d.x), f64::from(d.y)),
                f64::from(d.radius),
            );
            fill_shape(ctx, &circle, color.with_alpha(d.alpha));
        }
    })?;
    layer.blur(BOKEH_BLUR_SIGMA)?;
    base.over(&layer)
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
