use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{MainshotError, MainshotResult};

/// Decode an in-memory raster (PNG, JPEG, WebP, ...) and normalize it to straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> MainshotResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)?;
    Ok(dyn_img.to_rgba8())
}

/// Read and decode a raster file, see [`decode_image`].
pub fn load_image(path: impl AsRef<Path>) -> MainshotResult<image::RgbaImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))
        .map_err(|e| MainshotError::input(format!("{e:#}")))?;
    decode_image(&bytes)
}

/// Premultiply straight RGBA8 pixels in place.
pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// Convert premultiplied RGBA8 back into straight alpha in place.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = (((*c as u16).min(a) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
