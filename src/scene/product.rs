use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{MainshotError, MainshotResult};

/// Product metadata shown on the image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Product name, used as the title.
    #[serde(default)]
    pub name: String,
    /// Selling points in display order; duplicates are kept.
    #[serde(default)]
    pub selling_points: Vec<String>,
    /// Price amount.
    #[serde(default)]
    pub price: f64,
    /// Scene description appended to the background prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_prompt: Option<String>,
    /// Free-form extra background prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,
}

impl ProductInfo {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            ..Self::default()
        }
    }

    pub fn with_selling_points<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selling_points = points.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scene_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.scene_prompt = Some(prompt.into());
        self
    }

    pub fn with_custom_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.custom_prompt = Some(prompt.into());
        self
    }

    /// Parse from JSON.
    pub fn from_reader(reader: impl Read) -> MainshotResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| MainshotError::serde(format!("product info json: {e}")))
    }

    /// Price without a trailing `.0` for whole amounts.
    pub fn price_text(&self) -> String {
        format_price(self.price)
    }
}

/// `299.0` formats as `299`, `99.9` stays `99.9`.
pub fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 && price.abs() < 1e15 {
        format!("{}", price as i64)
    } else {
        format!("{price}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/product.rs"]
mod tests;
