use crate::foundation::color::PremulRgba8;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::foundation::math::{mul_div255_u8, mul_div255_u16};

/// Porter-Duff source-over for premultiplied pixels with an extra opacity multiplier.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc).min(out[3]);
    }
    out
}

/// Composite `src` over `dst` pixel by pixel.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> WingbeatResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(WingbeatError::shape(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Per-pixel linear mix `a·(1−w) + b·w` of two premultiplied buffers.
///
/// `weights` holds one factor per pixel; zero weights copy `a` exactly.
pub fn mix_by_weight(a: &[u8], b: &[u8], weights: &[f32], dst: &mut [u8]) -> WingbeatResult<()> {
    if a.len() != b.len() || a.len() != dst.len() || a.len() != weights.len() * 4 {
        return Err(WingbeatError::shape(
            "mix_by_weight expects matching rgba8 buffers and one weight per pixel",
        ));
    }
    for (((d, a), b), &w) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
        .zip(weights)
    {
        if w <= 0.0 {
            d.copy_from_slice(a);
            continue;
        }
        if w >= 1.0 {
            d.copy_from_slice(b);
            continue;
        }
        for c in 0..4 {
            let v = f32::from(a[c]) * (1.0 - w) + f32::from(b[c]) * w;
            d[c] = crate::foundation::math::to_u8(v);
        }
        d[0] = d[0].min(d[3]);
        d[1] = d[1].min(d[3]);
        d[2] = d[2].min(d[3]);
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque background, producing opaque straight RGBA8.
pub fn flatten_over_bg(dst: &mut [u8], src_premul: &[u8], bg_rgba: [u8; 4]) -> WingbeatResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(WingbeatError::shape(
            "flatten_over_bg expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - a;
        for c in 0..3 {
            d[c] = (u16::from(s[c]) + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
