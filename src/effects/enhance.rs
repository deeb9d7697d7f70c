use crate::foundation::color::{
    luma, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::foundation::math::to_u8;

/// Pixels at or below this alpha are left out of `alpha_gain`.
const VISIBLE_ALPHA: u8 = 10;

/// Global color adjustment with image-editor enhancer semantics.
///
/// Each factor interpolates between a degenerate image (`0`) and the input (`1`); values above
/// `1` extrapolate. Brightness scales toward black, saturation toward the pixel's grayscale and
/// contrast toward the mean luma of visible pixels. Passes run in that order. Alpha only changes
/// through `alpha_gain`, which strengthens every visible pixel (alpha above 10).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Enhance {
    /// Brightness factor.
    pub brightness: f32,
    /// Saturation factor.
    pub saturation: f32,
    /// Contrast factor.
    pub contrast: f32,
    /// Alpha multiplier for visible pixels.
    pub alpha_gain: f32,
}

impl Default for Enhance {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            saturation: 1.0,
            contrast: 1.0,
            alpha_gain: 1.0,
        }
    }
}

impl Enhance {
    /// Adjustment with the given factors.
    pub fn new(brightness: f32, saturation: f32, contrast: f32) -> Self {
        Self {
            brightness,
            saturation,
            contrast,
            alpha_gain: 1.0,
        }
    }

    /// Same adjustment with visible alpha multiplied by `gain`.
    pub fn with_alpha_gain(mut self, gain: f32) -> Self {
        self.alpha_gain = gain;
        self
    }

    /// Factors must be finite and non-negative.
    pub fn validate(&self) -> WingbeatResult<()> {
        for (name, v) in [
            ("brightness", self.brightness),
            ("saturation", self.saturation),
            ("contrast", self.contrast),
            ("alpha_gain", self.alpha_gain),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(WingbeatError::validation(format!(
                    "enhance.{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// `true` when applying this adjustment cannot change any pixel.
    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0
            && self.saturation == 1.0
            && self.contrast == 1.0
            && self.alpha_gain == 1.0
    }

    /// Adjust a premultiplied RGBA8 buffer in place.
    pub fn apply_premul(&self, data: &mut [u8]) {
        if self.is_identity() {
            return;
        }
        unpremultiply_rgba8_in_place(data);
        self.apply_straight(data);
        premultiply_rgba8_in_place(data);
    }

    /// Adjust a straight-alpha RGBA8 buffer in place.
    pub fn apply_straight(&self, data: &mut [u8]) {
        if self.brightness != 1.0 {
            for px in data.chunks_exact_mut(4) {
                for c in &mut px[..3] {
                    *c = to_u8(f32::from(*c) * self.brightness);
                }
            }
        }

        if self.saturation != 1.0 {
            for px in data.chunks_exact_mut(4) {
                let gray = luma([f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]);
                for c in &mut px[..3] {
                    *c = to_u8(gray + (f32::from(*c) - gray) * self.saturation);
                }
            }
        }

        if self.contrast != 1.0 {
            let mean = visible_mean_luma(data).round();
            for px in data.chunks_exact_mut(4) {
                for c in &mut px[..3] {
                    *c = to_u8(mean + (f32::from(*c) - mean) * self.contrast);
                }
            }
        }

        if self.alpha_gain != 1.0 {
            for px in data.chunks_exact_mut(4) {
                if px[3] > VISIBLE_ALPHA {
                    px[3] = (f32::from(px[3]) * self.alpha_gain).clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

fn visible_mean_luma(data: &[u8]) -> f32 {
    let (sum, n) = data
        .chunks_exact(4)
        .filter(|px| px[3] > 0)
        .fold((0.0f64, 0u64), |(sum, n), px| {
            let l = luma([f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]);
            (sum + f64::from(l), n + 1)
        });
    if n == 0 {
        return 0.0;
    }
    (sum / n as f64) as f32
}

/// Lightning-style boost of one straight RGB pixel: scale by `brightness`, then stretch around
/// mid-gray by `contrast`.
pub fn boost_pixel(rgb: [u8; 3], brightness: f32, contrast: f32) -> [u8; 3] {
    rgb.map(|c| {
        let lit = f32::from(c) * brightness;
        to_u8(128.0 + (lit - 128.0) * contrast)
    })
}

/// Apply [`boost_pixel`] to one premultiplied pixel, keeping alpha.
pub(crate) fn boost_premul(px: &mut [u8], brightness: f32, contrast: f32) {
    let a = px[3];
    if a == 0 {
        return;
    }
    let straight = crate::foundation::color::unpremultiply([px[0], px[1], px[2], a]);
    let [r, g, b] = boost_pixel([straight[0], straight[1], straight[2]], brightness, contrast);
    let out = crate::foundation::color::premultiply([r, g, b, a]);
    px.copy_from_slice(&out);
}

#[cfg(test)]
#[path = "../../tests/unit/effects/enhance.rs"]
mod tests;
