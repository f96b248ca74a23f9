//! Mainshot renders e-commerce product main images from declarative templates.
//!
//! A [`Template`] describes a canvas, a background treatment and an ordered list of elements
//! (product photo, title, price, selling points). The [`Renderer`] draws one template for one
//! product; the [`Composer`] picks templates per platform and renders a whole batch.
//!
//! Backgrounds are drawn locally (solid, gradient, bands, bokeh) or come from an external
//! [`BackgroundGenerator`]. Generator failures never fail a render: the template's fallback
//! gradient is used instead.
#![forbid(unsafe_code)]

mod assets;
mod collab;
mod compose;
mod effects;
mod foundation;
mod render;
mod scene;

pub use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
pub use crate::foundation::error::{MainshotError, MainshotResult};

pub use crate::assets::color::{
    HexColor, NEUTRAL_BRIGHTNESS, format_color, lerp_gradient, parse_color, sample_brightness,
};
pub use crate::assets::decode::{decode_image, load_image};
pub use crate::assets::font::{FONT_ENV, FontLoader, ResolvedFont, SYSTEM_FONT_CANDIDATES};

pub use crate::collab::http::{
    API_KEY_ENV, GenerationOpts, HttpBackgroundGenerator, POLL_INTERVAL_ENV, TIMEOUT_ENV,
};
pub use crate::collab::prompt::{background_request, build_prompt, match_size, size_string};
pub use crate::collab::remover::PassthroughRemover;
pub use crate::collab::scene::SceneCompositor;
pub use crate::collab::{BackgroundGenerator, BackgroundRemover, BackgroundRequest};

pub use crate::compose::composer::{Composer, ComposerOpts};
pub use crate::compose::renderer::{RenderInputs, RenderedImage, Renderer};
pub use crate::compose::select::{Selection, bare_template, select_template};

pub use crate::scene::presets::{Platform, PresetCatalog, SceneCategory, ScenePreset};
pub use crate::scene::product::{ProductInfo, format_price};
pub use crate::scene::store::{DirTemplateStore, MemoryTemplateStore, TemplateStore};
pub use crate::scene::template::{
    BackgroundKind, BackgroundSpec, BokehSpec, Coord, ElementSpec, FontWeight, PointsLayout,
    PriceSpec, PriceStyle, ProductImageSpec, SellingPointsSpec, Template, TitleSpec, TitleStyle,
};
