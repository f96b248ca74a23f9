use image::{DynamicImage, RgbaImage};

use crate::collab::BackgroundRemover;
use crate::foundation::error::MainshotResult;

/// Keeps the image as-is, only normalizing it to RGBA.
///
/// Used when the product already has a transparent background or no remover is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughRemover;

impl BackgroundRemover for PassthroughRemover {
    fn remove(&self, image: &DynamicImage) -> MainshotResult<RgbaImage> {
        Ok(image.to_rgba8())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collab/remover.rs"]
mod tests;
