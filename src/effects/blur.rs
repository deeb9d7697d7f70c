use rayon::prelude::*;

use crate::foundation::core::Canvas;
use crate::foundation::error::{WingbeatError, WingbeatResult};

/// Largest accepted blur sigma in pixels.
pub const MAX_BLUR_SIGMA: f32 = 512.0;

/// Reject a sigma that is negative, non-finite or above [`MAX_BLUR_SIGMA`].
pub(crate) fn check_sigma(name: &str, sigma: f32) -> WingbeatResult<()> {
    if !sigma.is_finite() || !(0.0..=MAX_BLUR_SIGMA).contains(&sigma) {
        return Err(WingbeatError::validation(format!(
            "{name} must be finite and in [0, {MAX_BLUR_SIGMA}]"
        )));
    }
    Ok(())
}

/// Separable Gaussian blur over premultiplied RGBA8.
///
/// `sigma` follows image-editor "radius" semantics (standard deviation in pixels); the kernel
/// extends to `ceil(3·sigma)` taps on each side. Edges repeat.
pub fn blur_premul(src: &[u8], width: u32, height: u32, sigma: f32) -> WingbeatResult<Vec<u8>> {
    Canvas::new(width, height)?.check_rgba8(src)?;
    check_sigma("blur sigma", sigma)?;
    if sigma == 0.0 {
        return Ok(src.to_vec());
    }
    let kernel = gaussian_kernel_q16(sigma)?;

    let row_len = width as usize * 4;
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];

    tmp.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| horizontal_row(src, row, y, width, &kernel));
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| vertical_row(&tmp, row, y, width, height, &kernel));
    Ok(out)
}

fn gaussian_kernel_q16(sigma: f32) -> WingbeatResult<Vec<u32>> {
    check_sigma("blur sigma", sigma)?;
    let radius = (3.0 * sigma).ceil().max(1.0) as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;

    let weights_f: Vec<f64> = (-radius..=radius)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(WingbeatError::validation("gaussian kernel sum is zero"));
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

fn horizontal_row(src: &[u8], dst: &mut [u8], y: usize, width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let base = y * width as usize;
    for x in 0..w {
        let mut acc = [0u64; 4];
        for (ki, &kw) in k.iter().enumerate() {
            let sx = (x + ki as i64 - radius).clamp(0, w - 1) as usize;
            let idx = (base + sx) * 4;
            for c in 0..4 {
                acc[c] += u64::from(kw) * u64::from(src[idx + c]);
            }
        }
        write_px(&mut dst[x as usize * 4..x as usize * 4 + 4], acc);
    }
}

fn vertical_row(src: &[u8], dst: &mut [u8], y: usize, width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let h = i64::from(height);
    let w = width as usize;
    for x in 0..w {
        let mut acc = [0u64; 4];
        for (ki, &kw) in k.iter().enumerate() {
            let sy = (y as i64 + ki as i64 - radius).clamp(0, h - 1) as usize;
            let idx = (sy * w + x) * 4;
            for c in 0..4 {
                acc[c] += u64::from(kw) * u64::from(src[idx + c]);
            }
        }
        write_px(&mut dst[x * 4..x * 4 + 4], acc);
    }
}

fn write_px(px: &mut [u8], acc: [u64; 4]) {
    let a = q16_to_u8(acc[3]);
    px[3] = a;
    for c in 0..3 {
        px[c] = q16_to_u8(acc[c]).min(a);
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
