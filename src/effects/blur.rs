use crate::foundation::error::{MainshotError, MainshotResult};

/// Kernel half-width used for a given Gaussian sigma.
pub fn kernel_radius(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (2.0 * sigma).ceil() as u32
}

/// Separable Gaussian blur over premultiplied RGBA8, fixed-point Q16 weights, clamped edges.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> MainshotResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MainshotError::validation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(MainshotError::validation(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    pass(src, &mut tmp, width, height, &kernel, Axis::X);
    pass(&tmp, &mut out, width, height, &kernel, Axis::Y);
    Ok(out)
}

/// Blur a mostly transparent layer in place.
///
/// Only the bounding box of non-transparent pixels, grown by the kernel radius, is processed;
/// everything outside it stays fully transparent.
pub fn blur_layer_in_place(
    data: &mut [u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> MainshotResult<()> {
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return Ok(());
    }
    let Some((x0, y0, x1, y1)) = opaque_bounds(data, width, height) else {
        return Ok(());
    };

    let x0 = x0.saturating_sub(radius);
    let y0 = y0.saturating_sub(radius);
    let x1 = (x1 + radius).min(width);
    let y1 = (y1 + radius).min(height);
    let cw = x1 - x0;
    let ch = y1 - y0;

    let stride = width as usize * 4;
    let row_len = cw as usize * 4;
    let mut crop = Vec::with_capacity(row_len * ch as usize);
    for y in y0..y1 {
        let start = y as usize * stride + x0 as usize * 4;
        crop.extend_from_slice(&data[start..start + row_len]);
    }

    let blurred = blur_rgba8_premul(&crop, cw, ch, radius, sigma)?;
    for (row, y) in (y0..y1).enumerate() {
        let start = y as usize * stride + x0 as usize * 4;
        data[start..start + row_len].copy_from_slice(&blurred[row * row_len..(row + 1) * row_len]);
    }
    Ok(())
}

/// Half-open `(x0, y0, x1, y1)` box around pixels with non-zero alpha.
fn opaque_bounds(data: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height {
        for x in 0..width {
            let i = (y as usize * width as usize + x as usize) * 4;
            if data.get(i + 3).copied().unwrap_or(0) == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x + 1), d.max(y + 1)),
            });
        }
    }
    bounds
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> MainshotResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(MainshotError::validation("blur sigma must be > 0"));
    }

    let r = i64::from(radius);
    let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
    let raw: Vec<f64> = (-r..=r)
        .map(|i| (-((i * i) as f64) / two_sigma_sq).exp())
        .collect();
    let sum: f64 = raw.iter().sum();

    let mut weights: Vec<u32> = raw
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Rounding drift goes to the center tap so the kernel sums to exactly 1.0.
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - total).clamp(0, 65536) as u32;
    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

/// One 1D convolution along `axis`; samples past the edge clamp to the border pixel.
fn pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as i64;
    let (w, h) = (i64::from(width), i64::from(height));
    let (along, stride) = match axis {
        Axis::X => (w, 1),
        Axis::Y => (h, w),
    };
    for y in 0..h {
        for x in 0..w {
            let pos = match axis {
                Axis::X => x,
                Axis::Y => y,
            };
            let origin = y * w + x - pos * stride;
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let s = (pos + ki as i64 - radius).clamp(0, along - 1);
                let idx = ((origin + s * stride) as usize) * 4;
                for (a, &c) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                    *a += u64::from(kw) * u64::from(c);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for (d, a) in dst[out..out + 4].iter_mut().zip(acc) {
                *d = q16_to_u8(a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
