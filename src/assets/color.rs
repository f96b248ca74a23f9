use crate::foundation::core::Rgba8;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Luminance reported when a sample region falls entirely outside the image.
pub const NEUTRAL_BRIGHTNESS: f64 = 128.0;

/// Parse `#RRGGBB` / `#RRGGBBAA` (leading `#` optional, case-insensitive).
///
/// Anything else resolves to opaque black instead of failing, so a typo in a template never
/// aborts a render.
pub fn parse_color(s: &str) -> Rgba8 {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(s: &str, at: usize) -> Option<u8> {
        s.get(at..at + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    }

    let parsed = match s.len() {
        6 => (|| Some(Rgba8::rgb(hex_byte(s, 0)?, hex_byte(s, 2)?, hex_byte(s, 4)?)))(),
        8 => (|| {
            Some(Rgba8::rgba(
                hex_byte(s, 0)?,
                hex_byte(s, 2)?,
                hex_byte(s, 4)?,
                hex_byte(s, 6)?,
            ))
        })(),
        _ => None,
    };
    parsed.unwrap_or(Rgba8::BLACK)
}

/// Format as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
pub fn format_color(c: Rgba8) -> String {
    if c.a == 255 {
        format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", c.r, c.g, c.b, c.a)
    }
}

/// Template-facing color: a hex string on the wire, an [`Rgba8`] in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub Rgba8);

impl HexColor {
    /// Parse permissively (see [`parse_color`]).
    pub fn parse(s: &str) -> Self {
        Self(parse_color(s))
    }

    /// Underlying straight-alpha color.
    pub fn rgba(self) -> Rgba8 {
        self.0
    }
}

impl From<Rgba8> for HexColor {
    fn from(c: Rgba8) -> Self {
        Self(c)
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format_color(self.0))
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Other(serde_json::Value),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Ok(Self::parse(&s)),
            Repr::Other(_) => Ok(Self(Rgba8::BLACK)),
        }
    }
}

/// Mean perceptual luminance of RGB pixel data inside a rectangle.
///
/// The rectangle is clamped to the image. An empty clamped area yields
/// [`NEUTRAL_BRIGHTNESS`].
pub(crate) fn sample_brightness_rgba8(
    data: &[u8],
    width: u32,
    height: u32,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
) -> f64 {
    let x0 = x.clamp(0, i64::from(width));
    let y0 = y.clamp(0, i64::from(height));
    let x1 = x.saturating_add(w).clamp(0, i64::from(width));
    let y1 = y.saturating_add(h).clamp(0, i64::from(height));
    if x1 <= x0 || y1 <= y0 {
        return NEUTRAL_BRIGHTNESS;
    }

    let stride = width as usize * 4;
    let mut sum = 0.0f64;
    for row in y0..y1 {
        let base = row as usize * stride;
        for col in x0..x1 {
            let i = base + col as usize * 4;
            sum += Rgba8::rgb(data[i], data[i + 1], data[i + 2]).luminance();
        }
    }
    let n = ((x1 - x0) * (y1 - y0)) as f64;
    (sum / n).clamp(0.0, 255.0)
}

/// Mean perceptual luminance of an image region, see [`sample_brightness_rgba8`].
pub fn sample_brightness(image: &RgbaImage, x: i64, y: i64, w: i64, h: i64) -> f64 {
    sample_brightness_rgba8(image.as_raw(), image.width(), image.height(), x, y, w, h)
}

/// Per-row colors for a vertical linear blend from `top` (row 0) towards `bottom`.
pub fn lerp_gradient(top: Rgba8, bottom: Rgba8, height: u32) -> Vec<Rgba8> {
    fn lerp(a: u8, b: u8, t: f64) -> u8 {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        v.clamp(0.0, 255.0) as u8
    }

    let h = f64::from(height.max(1));
    (0..height)
        .map(|y| {
            let t = f64::from(y) / h;
            Rgba8::rgba(
                lerp(top.r, bottom.r, t),
                lerp(top.g, bottom.g, t),
                lerp(top.b, bottom.b, t),
                lerp(top.a, bottom.a, t),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
