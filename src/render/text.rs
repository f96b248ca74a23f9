use kurbo::{Rect, RoundedRect};

use crate::assets::color::lerp_gradient;
use crate::assets::font::{TextBlock, TextEngine};
use crate::foundation::core::Rgba8;
use crate::foundation::error::MainshotResult;
use crate::foundation::math::mul_div255_u8;
use crate::render::surface::{Rasterizer, Surface, fill_shape};
use crate::scene::template::Coord;

/// Offset of the legibility shadow.
pub(crate) const SHADOW_OFFSET: f64 = 2.0;
const SHADOW_ALPHA: u8 = 110;

/// Separator for the single-line selling-point layout.
pub(crate) const POINT_SEPARATOR: &str = "  ·  ";

pub(crate) const BANNER_PAD: (f64, f64) = (40.0, 12.0);
const BANNER_RADIUS: f64 = 12.0;
const BANNER_DEFAULT: Rgba8 = Rgba8::rgba(0, 0, 0, 0x80);

pub(crate) const BADGE_PAD: (f64, f64) = (30.0, 16.0);
pub(crate) const BADGE_DEFAULT: [Rgba8; 2] = [Rgba8::rgb(0xFF, 0x4D, 0x4F), Rgba8::rgb(0xD9, 0x36, 0x3E)];

pub(crate) const CAPSULE_PAD: (f64, f64) = (16.0, 8.0);
pub(crate) const CAPSULE_GAP: f64 = 10.0;
pub(crate) const CAPSULE_ROW_GAP: f64 = 10.0;
/// Left/right margin used for wrapping when a capsule row is centered.
pub(crate) const CAPSULE_MARGIN: f64 = 40.0;

pub(crate) const TAG_PAD: f64 = 8.0;
pub(crate) const TAG_RADIUS: f64 = 4.0;
pub(crate) const TAG_ROW_EXTRA: f64 = 16.0;

/// Outline drawn around glyphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Stroke {
    pub(crate) color: Rgba8,
    pub(crate) width: f32,
}

/// Resolved colors for one text element in one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TextPaint {
    pub(crate) fill: Rgba8,
    pub(crate) stroke: Option<Stroke>,
    /// Background for chips, capsules and banners; `None` keeps the element's own.
    pub(crate) chip: Option<Rgba8>,
}

impl TextPaint {
    pub(crate) fn solid(fill: Rgba8) -> Self {
        Self {
            fill,
            stroke: None,
            chip: None,
        }
    }

    pub(crate) fn with_stroke(mut self, color: Option<Rgba8>, width: f32) -> Self {
        self.stroke = match color {
            Some(color) if width.is_finite() && width > 0.0 => Some(Stroke { color, width }),
            _ => None,
        };
        self
    }
}

/// Shadow color that contrasts with the text's own luminance.
pub(crate) fn shadow_color(text: Rgba8) -> Rgba8 {
    if text.luminance() < 128.0 {
        Rgba8::BLACK.with_alpha(SHADOW_ALPHA)
    } else {
        Rgba8::WHITE.with_alpha(SHADOW_ALPHA)
    }
}

/// Glyph offsets that together trace an outline `width` pixels wide.
pub(crate) fn stroke_offsets(width: f32) -> Vec<(f64, f64)> {
    let w = f64::from(width);
    if !w.is_finite() || w <= 0.0 {
        return Vec::new();
    }
    let rings = w.ceil().max(1.0) as u32;
    let mut out = Vec::new();
    for ring in 1..=rings {
        let r = w * f64::from(ring) / f64::from(rings);
        let steps = 8 * ring;
        for k in 0..steps {
            let a = std::f64::consts::TAU * f64::from(k) / f64::from(steps);
            out.push((r * a.cos(), r * a.sin()));
        }
    }
    out
}

/// Pill for a badge whose text is `text_w` x `text_h`, anchored at `(x, y)`.
pub(crate) fn pill_rect(x: f64, y: f64, text_w: f64, text_h: f64) -> RoundedRect {
    let rect = Rect::new(
        x,
        y,
        x + text_w + 2.0 * BADGE_PAD.0,
        y + text_h + 2.0 * BADGE_PAD.1,
    );
    RoundedRect::from_rect(rect, rect.height() / 2.0)
}

/// Capsule rectangles for a wrapping row layout.
///
/// Wrapping happens when the next capsule would cross `canvas_w - start_x`; each row holds at
/// least one capsule. Centered layouts wrap against [`CAPSULE_MARGIN`] and then center every row.
pub(crate) fn capsule_layout(
    sizes: &[(f64, f64)],
    x: Coord,
    y: f64,
    canvas_w: f64,
) -> Vec<Rect> {
    let start_x = match x {
        Coord::Px(v) => v,
        Coord::Center => CAPSULE_MARGIN,
    };
    let limit = canvas_w - start_x;
    let tag_h = sizes
        .iter()
        .map(|&(_, h)| h + 2.0 * CAPSULE_PAD.1)
        .fold(0.0f64, f64::max);

    let mut rows: Vec<Vec<Rect>> = vec![Vec::new()];
    let mut cursor = start_x;
    let mut row_y = y;
    for &(w, _) in sizes {
        let tag_w = w + 2.0 * CAPSULE_PAD.0;
        let row_has_items = rows.last().is_some_and(|r| !r.is_empty());
        if row_has_items && cursor + tag_w > limit {
            rows.push(Vec::new());
            cursor = start_x;
            row_y += tag_h + CAPSULE_ROW_GAP;
        }
        if let Some(row) = rows.last_mut() {
            row.push(Rect::new(cursor, row_y, cursor + tag_w, row_y + tag_h));
        }
        cursor += tag_w + CAPSULE_GAP;
    }

    if x.is_center() {
        for row in &mut rows {
            let (Some(first), Some(last)) = (row.first(), row.last()) else {
                continue;
            };
            let row_w = last.x1 - first.x0;
            let shift = ((canvas_w - row_w) / 2.0).floor() - first.x0;
            for r in row.iter_mut() {
                *r = *r + kurbo::Vec2::new(shift, 0.0);
            }
        }
    }
    rows.into_iter().flatten().collect()
}

/// One chip per point: text origin and chip rectangle.
pub(crate) fn tag_stack(
    widths: &[f64],
    x: Coord,
    y: f64,
    font_size: f64,
    canvas_w: f64,
) -> Vec<((f64, f64), Rect)> {
    widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let ty = y + i as f64 * (font_size + TAG_ROW_EXTRA);
            let tx = x.resolve(canvas_w, w);
            let chip = Rect::new(tx - TAG_PAD, ty - TAG_PAD, tx + w + TAG_PAD, ty + font_size + TAG_PAD);
            ((tx, ty), chip)
        })
        .collect()
}

/// Measured extent of something drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Drawn {
    /// Box of the glyph layout.
    pub(crate) text: Rect,
    /// Background shape bounds, when one was drawn.
    pub(crate) chip: Option<Rect>,
}

/// Text drawing bound to one surface.
pub(crate) struct TextPainter<'a> {
    pub(crate) base: &'a mut Surface,
    pub(crate) raster: &'a mut Rasterizer,
    pub(crate) engine: &'a mut TextEngine,
}

impl TextPainter<'_> {
    fn canvas_w(&self) -> f64 {
        f64::from(self.base.width)
    }

    fn canvas_h(&self) -> f64 {
        f64::from(self.base.height)
    }

    /// Shadow, stroke, then fill, composited as one layer.
    fn glyphs(
        &mut self,
        block: &TextBlock,
        x: f64,
        y: f64,
        paint: &TextPaint,
        shadow: bool,
    ) -> MainshotResult<()> {
        let engine = &mut *self.engine;
        let layer = self.raster.layer(self.base.width, self.base.height, |ctx| {
            if shadow {
                let c = shadow_color(paint.fill);
                engine.draw(ctx, block, x + SHADOW_OFFSET, y + SHADOW_OFFSET, c);
            }
            if let Some(stroke) = paint.stroke {
                for (dx, dy) in stroke_offsets(stroke.width) {
                    engine.draw(ctx, block, x + dx, y + dy, stroke.color);
                }
            }
            engine.draw(ctx, block, x, y, paint.fill);
        })?;
        self.base.over(&layer)
    }

    fn shape(&mut self, shape: &impl kurbo::Shape, color: Rgba8) -> MainshotResult<()> {
        let layer = self
            .raster
            .layer(self.base.width, self.base.height, |ctx| fill_shape(ctx, shape, color))?;
        self.base.over(&layer)
    }

    /// Shape filled with a vertical gradient spanning its bounding box.
    fn gradient_shape(
        &mut self,
        shape: &impl kurbo::Shape,
        top: Rgba8,
        bottom: Rgba8,
    ) -> MainshotResult<()> {
        let mut layer = self.raster.layer(self.base.width, self.base.height, |ctx| {
            fill_shape(ctx, shape, Rgba8::WHITE)
        })?;
        let bbox = shape.bounding_box();
        let y0 = bbox.y0.floor().max(0.0) as u32;
        let y1 = (bbox.y1.ceil().max(0.0) as u32).min(layer.height);
        let rows = lerp_gradient(top, bottom, y1.saturating_sub(y0));
        let stride = layer.width as usize * 4;
        for (i, color) in rows.iter().enumerate() {
            let px = color.premul().to_array();
            let start = (y0 as usize + i) * stride;
            for p in layer.data[start..start + stride].chunks_exact_mut(4) {
                let coverage = u16::from(p[3]);
                if coverage == 0 {
                    continue;
                }
                for c in 0..4 {
                    p[c] = mul_div255_u8(u16::from(px[c]), coverage);
                }
            }
        }
        self.base.over(&layer)
    }

    /// Plain text with shadow and optional stroke; `x`/`y` may be centered.
    pub(crate) fn plain(
        &mut self,
        text: &str,
        x: Coord,
        y: Coord,
        size: f32,
        bold: bool,
        paint: &TextPaint,
    ) -> MainshotResult<Drawn> {
        let block = self.engine.layout(text, size, bold);
        let tx = x.resolve(self.canvas_w(), block.width);
        let ty = y.resolve(self.canvas_h(), block.height);
        self.glyphs(&block, tx, ty, paint, true)?;
        Ok(Drawn {
            text: Rect::new(tx, ty, tx + block.width, ty + block.height),
            chip: None,
        })
    }

    /// Text on a translucent rounded banner sized to the text plus padding.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn banner(
        &mut self,
        text: &str,
        x: Coord,
        y: Coord,
        size: f32,
        bold: bool,
        banner: Option<Rgba8>,
        paint: &TextPaint,
    ) -> MainshotResult<Drawn> {
        let block = self.engine.layout(text, size, bold);
        let tx = x.resolve(self.canvas_w(), block.width);
        let ty = y.resolve(self.canvas_h(), block.height);
        let rect = Rect::new(
            tx - BANNER_PAD.0,
            ty - BANNER_PAD.1,
            tx + block.width + BANNER_PAD.0,
            ty + block.height + BANNER_PAD.1,
        );
        let radius = BANNER_RADIUS.min(rect.height() / 2.0);
        let fill = paint.chip.or(banner).unwrap_or(BANNER_DEFAULT);
        self.shape(&RoundedRect::from_rect(rect, radius), fill)?;
        self.glyphs(&block, tx, ty, paint, false)?;
        Ok(Drawn {
            text: Rect::new(tx, ty, tx + block.width, ty + block.height),
            chip: Some(rect),
        })
    }

    /// Text inside a gradient pill.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn badge(
        &mut self,
        text: &str,
        x: Coord,
        y: Coord,
        size: f32,
        bold: bool,
        colors: &[Rgba8],
        paint: &TextPaint,
    ) -> MainshotResult<Drawn> {
        let block = self.engine.layout(text, size, bold);
        let pill_w = block.width + 2.0 * BADGE_PAD.0;
        let pill_h = block.height + 2.0 * BADGE_PAD.1;
        let px = x.resolve(self.canvas_w(), pill_w);
        let py = y.resolve(self.canvas_h(), pill_h);
        let pill = pill_rect(px, py, block.width, block.height);

        let (top, bottom) = match colors {
            [] => (BADGE_DEFAULT[0], BADGE_DEFAULT[1]),
            [only] => (*only, *only),
            [top, bottom, ..] => (*top, *bottom),
        };
        self.gradient_shape(&pill, top, bottom)?;

        let tx = px + BADGE_PAD.0;
        let ty = py + BADGE_PAD.1;
        self.glyphs(&block, tx, ty, paint, false)?;
        Ok(Drawn {
            text: Rect::new(tx, ty, tx + block.width, ty + block.height),
            chip: Some(pill.rect()),
        })
    }

    /// All points on one line, separated by [`POINT_SEPARATOR`], shadow only.
    pub(crate) fn points_line(
        &mut self,
        points: &[String],
        x: Coord,
        y: Coord,
        size: f32,
        fill: Rgba8,
    ) -> MainshotResult<Drawn> {
        let joined = points.join(POINT_SEPARATOR);
        self.plain(&joined, x, y, size, false, &TextPaint::solid(fill))
    }

    /// Individually sized capsules that wrap onto new rows.
    pub(crate) fn capsules(
        &mut self,
        points: &[String],
        x: Coord,
        y: f64,
        size: f32,
        chip: Rgba8,
        paint: &TextPaint,
    ) -> MainshotResult<Vec<Drawn>> {
        let blocks: Vec<TextBlock> = points
            .iter()
            .map(|p| self.engine.layout(p, size, false))
            .collect();
        let sizes: Vec<(f64, f64)> = blocks.iter().map(|b| (b.width, b.height)).collect();
        let rects = capsule_layout(&sizes, x, y, self.canvas_w());
        let fill = paint.chip.unwrap_or(chip);

        let mut out = Vec::with_capacity(rects.len());
        for (block, rect) in blocks.iter().zip(rects) {
            let capsule = RoundedRect::from_rect(rect, rect.height() / 2.0);
            self.shape(&capsule, fill)?;
            let tx = rect.x0 + CAPSULE_PAD.0;
            let ty = rect.y0 + CAPSULE_PAD.1;
            self.glyphs(block, tx, ty, paint, false)?;
            out.push(Drawn {
                text: Rect::new(tx, ty, tx + block.width, ty + block.height),
                chip: Some(rect),
            });
        }
        Ok(out)
    }

    /// One rounded chip per point, stacked downwards.
    pub(crate) fn tags(
        &mut self,
        points: &[String],
        x: Coord,
        y: f64,
        size: f32,
        chip: Rgba8,
        paint: &TextPaint,
    ) -> MainshotResult<Vec<Drawn>> {
        let blocks: Vec<TextBlock> = points
            .iter()
            .map(|p| self.engine.layout(p, size, false))
            .collect();
        let widths: Vec<f64> = blocks.iter().map(|b| b.width).collect();
        let rows = tag_stack(&widths, x, y, f64::from(size), self.canvas_w());
        let fill = paint.chip.unwrap_or(chip);

        let mut out = Vec::with_capacity(rows.len());
        for (block, ((tx, ty), rect)) in blocks.iter().zip(rows) {
            self.shape(&RoundedRect::from_rect(rect, TAG_RADIUS), fill)?;
            self.glyphs(block, tx, ty, paint, false)?;
            out.push(Drawn {
                text: Rect::new(tx, ty, tx + block.width, ty + block.height),
                chip: Some(rect),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
