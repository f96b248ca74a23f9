use crate::assets::color::HexColor;
use crate::foundation::core::Rgba8;
use crate::foundation::error::MainshotResult;
use crate::scene::presets::PresetCatalog;
use crate::scene::template::{
    BackgroundKind, BackgroundSpec, ElementSpec, ProductImageSpec, Template,
};

/// How a template was found; useful for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Tagged with the platform and named with the style keyword.
    Exact,
    /// Named with the style keyword; canvas adapted to the platform.
    Style,
    /// First available template; canvas adapted to the platform.
    First,
    /// Nothing stored; minimal product-only template.
    Bare,
}

/// Pick a template for `(platform, style)`.
///
/// Never fails for a known platform. Adapted templates only get a new canvas; element positions
/// are reused unchanged.
pub fn select_template(
    templates: &[Template],
    catalog: &PresetCatalog,
    platform: &str,
    style: &str,
) -> MainshotResult<(Template, Selection)> {
    let target = catalog.platform(platform)?.canvas();
    let keyword = catalog.style_keyword(style);

    if let Some(t) = templates
        .iter()
        .find(|t| t.platform.as_deref() == Some(platform) && t.name.contains(keyword))
    {
        return Ok((t.clone(), Selection::Exact));
    }
    if let Some(t) = templates.iter().find(|t| t.name.contains(keyword)) {
        return Ok((t.with_canvas(target), Selection::Style));
    }
    if let Some(t) = templates.first() {
        return Ok((t.with_canvas(target), Selection::First));
    }
    tracing::warn!(platform, style, "no templates available, using bare template");
    Ok((bare_template(platform, catalog)?, Selection::Bare))
}

/// White canvas with a single centered product at 70% x 65%.
pub fn bare_template(platform: &str, catalog: &PresetCatalog) -> MainshotResult<Template> {
    Ok(Template {
        name: "default".to_owned(),
        platform: Some(platform.to_owned()),
        canvas: catalog.platform(platform)?.canvas(),
        background: BackgroundSpec {
            kind: BackgroundKind::Solid,
            colors: vec![HexColor(Rgba8::WHITE)],
            ..BackgroundSpec::default()
        },
        elements: vec![ElementSpec::ProductImage(ProductImageSpec {
            max_width_pct: 70.0,
            max_height_pct: 65.0,
            glow_color: None,
        })],
        source: None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/select.rs"]
mod tests;
