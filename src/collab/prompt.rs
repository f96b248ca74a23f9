use crate::collab::BackgroundRequest;
use crate::foundation::core::Canvas;
use crate::scene::presets::PresetCatalog;
use crate::scene::product::ProductInfo;

const PRODUCT_NAME_SLOT: &str = "{product_name}";
const SEPARATOR: &str = "，";

/// Style prompt with the product name filled in, followed by the scene and custom prompts.
pub fn build_prompt(catalog: &PresetCatalog, info: &ProductInfo, style: &str) -> String {
    let mut prompt = catalog
        .style_prompt(style)
        .replace(PRODUCT_NAME_SLOT, &info.name);
    for extra in [&info.scene_prompt, &info.custom_prompt]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
    {
        prompt.push_str(SEPARATOR);
        prompt.push_str(extra);
    }
    prompt
}

/// Supported size whose aspect ratio is closest to `width / height`; ties keep the earlier entry.
pub fn match_size(sizes: &[(u32, u32)], width: u32, height: u32) -> Option<(u32, u32)> {
    if height == 0 {
        return None;
    }
    let target = f64::from(width) / f64::from(height);
    sizes
        .iter()
        .copied()
        .filter(|&(_, h)| h > 0)
        .min_by(|a, b| {
            let da = (f64::from(a.0) / f64::from(a.1) - target).abs();
            let db = (f64::from(b.0) / f64::from(b.1) - target).abs();
            da.total_cmp(&db)
        })
}

/// `"W*H"` as the generator expects it.
pub fn size_string((w, h): (u32, u32)) -> String {
    format!("{w}*{h}")
}

/// Request for a background sized to `canvas` in the given style.
pub fn background_request(
    catalog: &PresetCatalog,
    info: &ProductInfo,
    style: &str,
    canvas: Canvas,
) -> BackgroundRequest {
    let native = match_size(&catalog.generator_sizes, canvas.width, canvas.height)
        .unwrap_or((canvas.width, canvas.height));
    BackgroundRequest {
        prompt: build_prompt(catalog, info, style),
        negative_prompt: catalog.negative_prompt.clone(),
        width: canvas.width,
        height: canvas.height,
        size: size_string(native),
        reference: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/prompt.rs"]
mod tests;
