use image::{RgbImage, RgbaImage};

use crate::assets::color::sample_brightness_rgba8;
use crate::assets::decode::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::effects::blur::blur_layer_in_place;
use crate::effects::composite::{Extent, over_at, over_in_place};
use crate::foundation::core::Rgba8;
use crate::foundation::error::{MainshotError, MainshotResult};

/// Premultiplied RGBA8 working buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Surface {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Row-major premultiplied RGBA8.
    pub(crate) data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Surface filled with one color.
    pub(crate) fn filled(width: u32, height: u32, color: Rgba8) -> Self {
        let px = color.premul().to_array();
        Self {
            width,
            height,
            data: px.repeat(width as usize * height as usize),
        }
    }

    /// Surface whose row `y` is filled with `rows[y]`.
    pub(crate) fn from_rows(width: u32, rows: &[Rgba8]) -> Self {
        let mut data = Vec::with_capacity(width as usize * rows.len() * 4);
        for c in rows {
            data.extend(c.premul().to_array().repeat(width as usize));
        }
        Self {
            width,
            height: rows.len() as u32,
            data,
        }
    }

    /// Adopt a straight-alpha image.
    pub(crate) fn from_rgba(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let mut data = image.as_raw().clone();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width,
            height,
            data,
        }
    }

    pub(crate) fn extent(&self) -> Extent {
        Extent {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`, transparent when out of bounds.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Composite a same-sized layer on top.
    pub(crate) fn over(&mut self, layer: &Surface) -> MainshotResult<()> {
        if layer.width != self.width || layer.height != self.height {
            return Err(MainshotError::validation(format!(
                "layer {}x{} does not match surface {}x{}",
                layer.width, layer.height, self.width, self.height
            )));
        }
        over_in_place(&mut self.data, &layer.data, 1.0)
    }

    /// Composite `src` with its top-left corner at `(x, y)`.
    pub(crate) fn over_at(&mut self, src: &Surface, x: i64, y: i64) -> MainshotResult<()> {
        let dst_extent = self.extent();
        over_at(
            &mut self.data,
            dst_extent,
            &src.data,
            src.extent(),
            x,
            y,
            1.0,
        )
    }

    /// Gaussian blur of the whole surface.
    pub(crate) fn blur(&mut self, sigma: f32) -> MainshotResult<()> {
        blur_layer_in_place(&mut self.data, self.width, self.height, sigma)
    }

    /// Mean luminance of a region. Meaningful on opaque surfaces, where premultiplied and straight
    /// channels coincide.
    pub(crate) fn brightness(&self, x: i64, y: i64, w: i64, h: i64) -> f64 {
        sample_brightness_rgba8(&self.data, self.width, self.height, x, y, w, h)
    }

    /// Straight-alpha copy.
    pub(crate) fn to_rgba_image(&self) -> MainshotResult<RgbaImage> {
        let mut data = self.data.clone();
        unpremultiply_rgba8_in_place(&mut data);
        RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| MainshotError::validation("surface byte length mismatch"))
    }

    /// Drop alpha. Residual transparency ends up composited over black.
    pub(crate) fn flatten(&self) -> MainshotResult<RgbImage> {
        let rgb: Vec<u8> = self
            .data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        RgbImage::from_raw(self.width, self.height, rgb)
            .ok_or_else(|| MainshotError::validation("surface byte length mismatch"))
    }
}

/// Reusable `vello_cpu` context that rasterizes vector content into transparent layers.
#[derive(Default)]
pub(crate) struct Rasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl Rasterizer {
    /// Draw into a fresh transparent `width` x `height` layer.
    pub(crate) fn layer(
        &mut self,
        width: u32,
        height: u32,
        draw: impl FnOnce(&mut vello_cpu::RenderContext),
    ) -> MainshotResult<Surface> {
        let w: u16 = width
            .try_into()
            .map_err(|_| MainshotError::validation("layer width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| MainshotError::validation("layer height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Ok(Surface::new(width, height));
        }

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        draw(&mut ctx);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(Surface {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

pub(crate) fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Flatten any `kurbo` shape into a `vello_cpu` path.
pub(crate) fn to_cpu_path(shape: &impl kurbo::Shape) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let p = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(0.1) {
        match el {
            PathEl::MoveTo(a) => out.move_to(p(a)),
            PathEl::LineTo(a) => out.line_to(p(a)),
            PathEl::QuadTo(a, b) => out.quad_to(p(a), p(b)),
            PathEl::CurveTo(a, b, c) => out.curve_to(p(a), p(b), p(c)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Fill a shape with a solid color.
pub(crate) fn fill_shape(ctx: &mut vello_cpu::RenderContext, shape: &impl kurbo::Shape, c: Rgba8) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(cpu_color(c));
    ctx.fill_path(&to_cpu_path(shape));
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
