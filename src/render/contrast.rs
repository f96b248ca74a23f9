//! Text colors chosen from the luminance under a planned text region.
//!
//! Used when the base is a finished photograph whose colors are unknown until render time. The
//! result is always a fresh [`TextPaint`]; template elements are only read.

use kurbo::Rect;

use crate::foundation::core::{Canvas, Rgba8};
use crate::render::surface::Surface;
use crate::render::text::{Stroke, TAG_ROW_EXTRA, TextPaint};
use crate::scene::template::{Coord, ElementSpec, PointsLayout, PriceStyle};

/// Below this mean luminance a region counts as dark.
pub(crate) const DARK_THRESHOLD: f64 = 128.0;
const STROKE_WIDTH: f32 = 2.0;

/// Which palette entry an element uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TextRole {
    Title,
    Price,
    SellingPoints,
}

/// Region whose brightness decides the palette: the full width when centered, otherwise half the
/// canvas width starting at `x`.
pub(crate) fn sample_region(x: Coord, y: Coord, height: f64, canvas: Canvas) -> Rect {
    let cw = f64::from(canvas.width);
    let top = y.resolve(f64::from(canvas.height), height);
    match x {
        Coord::Center => Rect::new(0.0, top, cw, top + height),
        Coord::Px(x0) => Rect::new(x0, top, x0 + cw / 2.0, top + height),
    }
}

/// Role, anchor and planned height of a text element.
///
/// `None` for the product image and for badge prices, which keep their template colors on the
/// pill.
pub(crate) fn plan(element: &ElementSpec, point_count: usize) -> Option<(TextRole, Coord, Coord, f64)> {
    match element {
        ElementSpec::ProductImage(_) => None,
        ElementSpec::Title(t) => Some((TextRole::Title, t.x, t.y, f64::from(t.font_size))),
        ElementSpec::Price(p) => match p.style {
            PriceStyle::Badge => None,
            PriceStyle::Plain => Some((TextRole::Price, p.x, p.y, f64::from(p.font_size))),
        },
        ElementSpec::SellingPoints(s) => {
            let fs = f64::from(s.font_size);
            let h = match s.layout {
                PointsLayout::Plain => fs,
                PointsLayout::Horizontal => fs + TAG_ROW_EXTRA,
                PointsLayout::Vertical => point_count.max(1) as f64 * (fs + TAG_ROW_EXTRA),
            };
            Some((TextRole::SellingPoints, s.x, s.y, h))
        }
    }
}

/// Contrasting paint for `role` over a region of the given brightness.
pub(crate) fn palette(role: TextRole, brightness: f64) -> TextPaint {
    let dark = brightness < DARK_THRESHOLD;
    let stroke = Stroke {
        color: if dark { Rgba8::BLACK } else { Rgba8::WHITE },
        width: STROKE_WIDTH,
    };
    let (fill, chip) = match (role, dark) {
        (TextRole::Price, true) => (Rgba8::rgb(0xFF, 0xC5, 0x3D), None),
        (TextRole::Price, false) => (Rgba8::rgb(0xC0, 0x39, 0x2B), None),
        (TextRole::SellingPoints, true) => (
            Rgba8::rgba(0xFF, 0xFF, 0xFF, 0xE6),
            Some(Rgba8::rgba(0, 0, 0, 0x66)),
        ),
        (TextRole::SellingPoints, false) => (
            Rgba8::rgba(0x33, 0x33, 0x33, 0xE6),
            Some(Rgba8::rgba(0xFF, 0xFF, 0xFF, 0x99)),
        ),
        (TextRole::Title, true) => (Rgba8::rgb(0xFA, 0xFA, 0xFA), None),
        (TextRole::Title, false) => (Rgba8::rgb(0x1A, 0x1A, 0x1A), None),
    };
    TextPaint {
        fill,
        stroke: Some(stroke),
        chip,
    }
}

/// Sample `base` under the element's planned region and pick its paint.
pub(crate) fn adapt(base: &Surface, element: &ElementSpec, point_count: usize) -> Option<TextPaint> {
    let (role, x, y, h) = plan(element, point_count)?;
    let canvas = Canvas {
        width: base.width,
        height: base.height,
    };
    let r = sample_region(x, y, h, canvas);
    let brightness = base.brightness(
        r.x0.floor() as i64,
        r.y0.floor() as i64,
        r.width().ceil() as i64,
        r.height().ceil() as i64,
    );
    tracing::trace!(?role, brightness, "adaptive contrast");
    Some(palette(role, brightness))
}

#[cfg(test)]
#[path = "../../tests/unit/render/contrast.rs"]
mod tests;
