//! Boundaries to external services: background generation and background removal.

pub(crate) mod http;
pub(crate) mod prompt;
pub(crate) mod remover;
pub(crate) mod scene;

use image::{DynamicImage, RgbaImage};

use crate::foundation::error::MainshotResult;

/// One background-generation job.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundRequest {
    /// Positive prompt.
    pub prompt: String,
    /// Content the generator should avoid.
    pub negative_prompt: String,
    /// Size the returned image must have.
    pub width: u32,
    pub height: u32,
    /// Generator-native size, formatted `"W*H"`.
    pub size: String,
    /// Product already placed on a transparent canvas; the generator fills the scene around it.
    pub reference: Option<RgbaImage>,
}

/// External background generation.
///
/// Implementations may block for a long time. Every error is treated as recoverable by the
/// renderer, which falls back to a local gradient.
pub trait BackgroundGenerator: Send + Sync {
    /// Produce a background of `request.width` x `request.height`.
    fn generate(&self, request: &BackgroundRequest) -> MainshotResult<RgbaImage>;
}

/// External background removal: image in, image with transparent background out.
pub trait BackgroundRemover: Send + Sync {
    fn remove(&self, image: &DynamicImage) -> MainshotResult<RgbaImage>;
}
