use crate::foundation::error::{LuminaError, LuminaResult};

/// Separable Gaussian blur of a premultiplied RGBA8 buffer with clamped edges.
///
/// Weights are quantized to Q16 and renormalized so a constant image stays constant.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> LuminaResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LuminaError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(LuminaError::render(
            "blur expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    let (w, h) = (width as usize, height as usize);
    convolve(src, &mut tmp, w, h, &kernel, Axis::Horizontal);
    convolve(&tmp, &mut out, w, h, &kernel, Axis::Vertical);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> LuminaResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(LuminaError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(LuminaError::render("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

fn convolve(src: &[u8], dst: &mut [u8], w: usize, h: usize, k: &[u32], axis: Axis) {
    let radius = (k.len() / 2) as isize;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let d = ki as isize - radius;
                let (sx, sy) = match axis {
                    Axis::Horizontal => ((x as isize + d).clamp(0, w as isize - 1) as usize, y),
                    Axis::Vertical => (x, (y as isize + d).clamp(0, h as isize - 1) as usize),
                };
                let idx = (sy * w + sx) * 4;
                for (a, &s) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                    *a += u64::from(kw) * u64::from(s);
                }
            }
            let out_idx = (y * w + x) * 4;
            for (o, a) in dst[out_idx..out_idx + 4].iter_mut().zip(acc) {
                *o = q16_to_u8(a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
