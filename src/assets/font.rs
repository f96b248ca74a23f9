use std::{
    borrow::Cow,
    collections::HashMap,
    path::PathBuf,
};

use crate::foundation::core::Rgba8;

/// Environment variable naming a font file tried before any system path.
pub const FONT_ENV: &str = "MAINSHOT_FONT";

/// CJK-capable system font paths, most preferred first.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "C:/Windows/Fonts/msyh.ttc",
    "C:/Windows/Fonts/simhei.ttf",
];

const GENERIC_FAMILY: &str = "sans-serif";

/// Outcome of font resolution.
#[derive(Clone, Debug)]
pub enum ResolvedFont {
    /// A font file that exists and could be read.
    File {
        /// Where the bytes came from.
        path: PathBuf,
        /// Raw font file bytes.
        bytes: Vec<u8>,
    },
    /// The generic `sans-serif` family of the system collection.
    GenericSansSerif,
}

/// Prioritized font lookup that never fails.
#[derive(Clone, Debug)]
pub struct FontLoader {
    candidates: Vec<PathBuf>,
}

impl Default for FontLoader {
    fn default() -> Self {
        Self::from_env()
    }
}

impl FontLoader {
    /// `MAINSHOT_FONT` (when set) followed by [`SYSTEM_FONT_CANDIDATES`].
    pub fn from_env() -> Self {
        let mut candidates = Vec::new();
        if let Some(p) = std::env::var_os(FONT_ENV).filter(|p| !p.is_empty()) {
            candidates.push(PathBuf::from(p));
        }
        candidates.extend(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));
        Self { candidates }
    }

    /// Explicit candidate list; an empty list always resolves to the generic family.
    pub fn with_candidates(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Candidate paths in lookup order.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// First readable candidate, else the generic family.
    pub fn resolve(&self) -> ResolvedFont {
        for path in &self.candidates {
            match std::fs::read(path) {
                Ok(bytes) if !bytes.is_empty() => {
                    tracing::debug!(path = %path.display(), "using font file");
                    return ResolvedFont::File {
                        path: path.clone(),
                        bytes,
                    };
                }
                Ok(_) => tracing::debug!(path = %path.display(), "font file empty, skipping"),
                Err(_) => {}
            }
        }
        tracing::debug!("no font file found, falling back to generic sans-serif");
        ResolvedFont::GenericSansSerif
    }
}

/// Shaped single-line text plus its measured box.
///
/// Layout and drawing share this value, so a chip sized from `width`/`height` always matches the
/// glyphs drawn into it.
pub struct TextBlock {
    layout: parley::Layout<()>,
    /// Advance width in pixels (zero when no font could shape the text).
    pub width: f64,
    /// Line box height in pixels, never smaller than the font size.
    pub height: f64,
}

impl std::fmt::Debug for TextBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextBlock")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Parley-backed text measurement and glyph drawing with one resolved font stack.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    font_stack: String,
    cpu_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new(&FontLoader::from_env())
    }
}

impl TextEngine {
    /// Build an engine around whatever `loader` resolves.
    pub fn new(loader: &FontLoader) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let font_stack = match loader.resolve() {
            ResolvedFont::File { path, bytes } => {
                let families = font_ctx
                    .collection
                    .register_fonts(parley::fontique::Blob::from(bytes), None);
                let name = families
                    .first()
                    .and_then(|(id, _)| font_ctx.collection.family_name(*id))
                    .map(str::to_owned);
                match name {
                    Some(name) => format!("\"{name}\", {GENERIC_FAMILY}"),
                    None => {
                        tracing::debug!(path = %path.display(), "font file has no usable family");
                        GENERIC_FAMILY.to_owned()
                    }
                }
            }
            ResolvedFont::GenericSansSerif => GENERIC_FAMILY.to_owned(),
        };

        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font_stack,
            cpu_fonts: HashMap::new(),
        }
    }

    /// CSS-style font stack used for every layout.
    pub fn font_stack(&self) -> &str {
        &self.font_stack
    }

    /// Shape `text` on one line at `size_px`.
    pub fn layout(&mut self, text: &str, size_px: f32, bold: bool) -> TextBlock {
        let size_px = if size_px.is_finite() && size_px > 0.0 {
            size_px
        } else {
            1.0
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.font_stack.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let width = f64::from(layout.width()).max(0.0);
        let height = f64::from(layout.height()).max(f64::from(size_px));
        TextBlock {
            layout,
            width,
            height,
        }
    }

    /// Fill the glyphs of `block` with its top-left corner at `(x, y)`.
    pub(crate) fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        block: &TextBlock,
        x: f64,
        y: f64,
        color: Rgba8,
    ) {
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        for line in block.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let run = glyph_run.run();
                let src = run.font();
                let font = self
                    .cpu_fonts
                    .entry((src.data.id(), src.index))
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(src.data.data().to_vec()),
                            src.index,
                        )
                    })
                    .clone();
                let baseline = glyph_run.baseline();
                let mut pen = glyph_run.offset();
                let glyphs: Vec<vello_cpu::Glyph> = glyph_run
                    .glyphs()
                    .map(|g| {
                        let out = vello_cpu::Glyph {
                            id: g.id,
                            x: pen + g.x,
                            y: baseline - g.y,
                        };
                        pen += g.advance;
                        out
                    })
                    .collect();
                if glyphs.is_empty() {
                    continue;
                }
                ctx.glyph_run(&font)
                    .font_size(run.font_size())
                    .fill_glyphs(glyphs.into_iter());
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
