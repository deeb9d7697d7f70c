use rayon::prelude::*;

use crate::animation::ease::Ease;
use crate::animation::phase::LoopPhase;
use crate::effects::blur::{blur_premul, check_sigma};
use crate::effects::composite::over_in_place;
use crate::effects::enhance::boost_premul;
use crate::foundation::color::premultiply;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::render::frame::FrameRGBA;

/// Pixels at or below this alpha are not part of the artwork.
const VISIBLE_ALPHA: u8 = 10;

/// Horizontal band travelling from the bottom edge to above the top edge once per loop.
///
/// Row intensity falls off as a Gaussian with standard deviation `band_px / 2.5` around the band
/// center `H − ease(i/N)·(H + overshoot_px)`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sweep {
    /// Nominal band height in pixels.
    pub band_px: f32,
    /// Distance travelled past the top edge so the band fully leaves the image.
    pub overshoot_px: f32,
    /// Progress curve.
    pub ease: Ease,
    /// What the band does to the pixels it crosses.
    pub style: SweepStyle,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            band_px: 120.0,
            overshoot_px: 150.0,
            ease: Ease::Smoothstep,
            style: SweepStyle::Tint(Tint::default()),
        }
    }
}

/// Sweep rendering style.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SweepStyle {
    /// Boost brightness and contrast of the artwork inside the band.
    Brighten(Brighten),
    /// Paint a blurred golden overlay on the artwork inside the band.
    Tint(Tint),
}

/// Lightning-wave boost.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Brighten {
    /// Brightness gain at the band center.
    pub brightness: f32,
    /// Contrast gain at the band center.
    pub contrast: f32,
    /// Rows with a weaker intensity are left alone.
    pub threshold: f32,
}

impl Default for Brighten {
    fn default() -> Self {
        Self {
            brightness: 0.6,
            contrast: 0.3,
            threshold: 0.05,
        }
    }
}

/// Golden wave overlay.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tint {
    /// Overlay alpha at the band center.
    pub max_alpha: f32,
    /// Blur passes (standard deviations in pixels) applied to the overlay.
    pub blur: Vec<f32>,
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            max_alpha: 160.0,
            blur: vec![12.0, 8.0],
        }
    }
}

impl Sweep {
    pub(crate) fn validate(&self) -> WingbeatResult<()> {
        if !self.band_px.is_finite() || self.band_px <= 0.0 {
            return Err(WingbeatError::validation("sweep.band_px must be finite and > 0"));
        }
        if !self.overshoot_px.is_finite() || self.overshoot_px < 0.0 {
            return Err(WingbeatError::validation(
                "sweep.overshoot_px must be finite and >= 0",
            ));
        }
        match &self.style {
            SweepStyle::Brighten(b) => {
                if ![b.brightness, b.contrast, b.threshold]
                    .iter()
                    .all(|v| v.is_finite() && *v >= 0.0)
                {
                    return Err(WingbeatError::validation(
                        "sweep brighten gains must be finite and >= 0",
                    ));
                }
            }
            SweepStyle::Tint(t) => {
                if !t.max_alpha.is_finite() || !(0.0..=255.0).contains(&t.max_alpha) {
                    return Err(WingbeatError::validation(
                        "sweep.tint.max_alpha must be in [0, 255]",
                    ));
                }
                for &sigma in &t.blur {
                    check_sigma("sweep.tint.blur", sigma)?;
                }
            }
        }
        Ok(())
    }

    /// Band center row for a frame (may lie outside the image).
    pub fn center_y(&self, height: u32, phase: LoopPhase, frame: FrameIndex) -> f32 {
        let p = self.ease.apply(phase.progress(frame)) as f32;
        let h = height as f32;
        h - p * (h + self.overshoot_px)
    }

    /// Gaussian intensity of row `y` for a band centered at `center`.
    pub fn row_intensity(&self, y: u32, center: f32) -> f32 {
        let sigma = self.band_px / 2.5;
        let d = y as f32 - center;
        (-(d * d) / (2.0 * sigma * sigma)).exp().clamp(0.0, 1.0)
    }

    pub(crate) fn apply(
        &self,
        frame: &mut FrameRGBA,
        phase: LoopPhase,
        idx: FrameIndex,
    ) -> WingbeatResult<()> {
        let center = self.center_y(frame.height, phase, idx);
        let row_len = frame.width as usize * 4;
        match &self.style {
            SweepStyle::Brighten(b) => {
                frame
                    .data
                    .par_chunks_mut(row_len)
                    .enumerate()
                    .for_each(|(y, row)| {
                        let k = self.row_intensity(y as u32, center);
                        if k <= b.threshold {
                            return;
                        }
                        let (bright, contrast) = (1.0 + b.brightness * k, 1.0 + b.contrast * k);
                        for px in row.chunks_exact_mut(4) {
                            if px[3] > VISIBLE_ALPHA {
                                boost_premul(px, bright, contrast);
                            }
                        }
                    });
            }
            SweepStyle::Tint(t) => {
                let mut overlay = vec![0u8; frame.data.len()];
                overlay
                    .par_chunks_mut(row_len)
                    .zip(frame.data.par_chunks(row_len))
                    .enumerate()
                    .for_each(|(y, (dst, src))| {
                        let f = self.row_intensity(y as u32, center);
                        if f <= 0.01 {
                            return;
                        }
                        let color = premultiply(golden(f, t.max_alpha));
                        for (o, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                            if s[3] > VISIBLE_ALPHA {
                                o.copy_from_slice(&color);
                            }
                        }
                    });
                for &sigma in &t.blur {
                    overlay = blur_premul(&overlay, frame.width, frame.height, sigma)?;
                }
                over_in_place(&mut frame.data, &overlay, 1.0)?;
            }
        }
        Ok(())
    }
}

/// Straight RGBA of the golden wave at intensity `f`.
fn golden(f: f32, max_alpha: f32) -> [u8; 4] {
    let bi = f.powf(0.7);
    [
        (255.0 * bi) as u8,
        ((220.0 + 25.0 * f) * bi) as u8,
        ((120.0 + 40.0 * f) * bi) as u8,
        (max_alpha * f.sqrt()) as u8,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/sweep.rs"]
mod tests;
