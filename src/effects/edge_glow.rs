use crate::animation::phase::LoopPhase;
use crate::effects::blur::{blur_premul, check_sigma};
use crate::effects::composite::over_in_place;
use crate::foundation::color::premultiply;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::render::frame::FrameRGBA;

/// Pulsing glow ring drawn along the image border.
///
/// Ring alpha at distance `d` inside `inset_px` is `(1 − d/width)^falloff · max_alpha · pulse`
/// with `pulse = base + swing·sin θ`; the ring is blurred and composited over the frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdgeGlow {
    /// Distance of the ring's outer edge from the image border.
    pub inset_px: u32,
    /// Ring width in pixels.
    pub width_px: u32,
    /// Straight RGB of the glow.
    pub color: [u8; 3],
    /// Alpha at the outer edge at full pulse.
    pub max_alpha: f32,
    /// Falloff exponent toward the inner edge.
    pub falloff: f32,
    /// Pulse midline.
    pub pulse_base: f32,
    /// Pulse swing.
    pub pulse_swing: f32,
    /// Blur standard deviation in pixels.
    pub blur: f32,
}

impl Default for EdgeGlow {
    fn default() -> Self {
        Self {
            inset_px: 0,
            width_px: 45,
            color: [255, 250, 200],
            max_alpha: 180.0,
            falloff: 1.5,
            pulse_base: 0.7,
            pulse_swing: 0.3,
            blur: 15.0,
        }
    }
}

impl EdgeGlow {
    /// Narrower, paler ring stacked just inside the default one.
    pub fn inner() -> Self {
        Self {
            inset_px: 5,
            width_px: 25,
            color: [255, 255, 220],
            max_alpha: 140.0,
            falloff: 2.0,
            blur: 10.0,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> WingbeatResult<()> {
        if self.width_px == 0 {
            return Err(WingbeatError::validation("edge_glow.width_px must be >= 1"));
        }
        let finite_non_negative = [
            self.max_alpha,
            self.falloff,
            self.pulse_base,
            self.pulse_swing,
        ]
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0);
        if !finite_non_negative || self.max_alpha > 255.0 {
            return Err(WingbeatError::validation(
                "edge_glow parameters must be finite and >= 0, max_alpha <= 255",
            ));
        }
        check_sigma("edge_glow.blur", self.blur)
    }

    /// Ring alpha at inset `d` for a given pulse; faint values are dropped.
    pub fn ring_alpha(&self, d: u32, pulse: f32) -> u8 {
        if d >= self.width_px {
            return 0;
        }
        let t = 1.0 - d as f32 / self.width_px as f32;
        let a = (t.powf(self.falloff) * self.max_alpha * pulse).clamp(0.0, 255.0) as u8;
        if a > 5 { a } else { 0 }
    }

    /// Unblurred ring overlay (premultiplied).
    pub(crate) fn ring(&self, width: u32, height: u32, pulse: f32) -> Vec<u8> {
        let mut out = vec![0u8; (width as usize) * (height as usize) * 4];
        for y in 0..height {
            for x in 0..width {
                let d = x.min(y).min(width - 1 - x).min(height - 1 - y);
                let Some(d) = d.checked_sub(self.inset_px) else {
                    continue;
                };
                let a = self.ring_alpha(d, pulse);
                if a == 0 {
                    continue;
                }
                let [r, g, b] = self.color;
                let i = ((y as usize) * (width as usize) + x as usize) * 4;
                out[i..i + 4].copy_from_slice(&premultiply([r, g, b, a]));
            }
        }
        out
    }

    pub(crate) fn apply(
        &self,
        frame: &mut FrameRGBA,
        phase: LoopPhase,
        idx: FrameIndex,
    ) -> WingbeatResult<()> {
        let pulse = phase.pulse(idx, f64::from(self.pulse_base), f64::from(self.pulse_swing)) as f32;
        let ring = self.ring(frame.width, frame.height, pulse);
        let glow = blur_premul(&ring, frame.width, frame.height, self.blur)?;
        over_in_place(&mut frame.data, &glow, 1.0)
    }
}

/// Twinkling dots at the four corners and the four edge midpoints.
///
/// The twinkle runs twice per loop; dots are drawn only while the twinkle alpha exceeds 30.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Sparkles {
    /// Peak dot alpha.
    pub max_alpha: f32,
    /// Corner inset in pixels.
    pub corner_inset: u32,
    /// Edge-midpoint inset in pixels.
    pub edge_inset: u32,
    /// Blur standard deviation in pixels.
    pub blur: f32,
}

impl Default for Sparkles {
    fn default() -> Self {
        Self {
            max_alpha: 200.0,
            corner_inset: 20,
            edge_inset: 15,
            blur: 8.0,
        }
    }
}

impl Sparkles {
    pub(crate) fn validate(&self) -> WingbeatResult<()> {
        if !self.max_alpha.is_finite() || !(0.0..=255.0).contains(&self.max_alpha) {
            return Err(WingbeatError::validation(
                "sparkles.max_alpha must be in [0, 255]",
            ));
        }
        check_sigma("sparkles.blur", self.blur)
    }

    /// Twinkle alpha of a frame.
    pub fn twinkle(&self, phase: LoopPhase, idx: FrameIndex) -> f32 {
        let half = (phase.total_frames() / 2).max(1);
        let t = f64::from(idx.0 % half) / f64::from(half);
        ((t * std::f64::consts::TAU).sin().abs() as f32 * self.max_alpha).floor()
    }

    pub(crate) fn apply(
        &self,
        frame: &mut FrameRGBA,
        phase: LoopPhase,
        idx: FrameIndex,
    ) -> WingbeatResult<()> {
        let alpha = self.twinkle(phase, idx);
        if alpha <= 30.0 {
            return Ok(());
        }
        let (w, h) = (frame.width as i64, frame.height as i64);
        let (ci, ei) = (i64::from(self.corner_inset), i64::from(self.edge_inset));
        let mut overlay = vec![0u8; frame.data.len()];
        for (cx, cy) in [(ci, ci), (w - ci, ci), (ci, h - ci), (w - ci, h - ci)] {
            dot(&mut overlay, w, h, (cx, cy), 12, [255, 255, 255], alpha);
        }
        for (cx, cy) in [(w / 2, ei), (w / 2, h - ei), (ei, h / 2), (w - ei, h / 2)] {
            dot(&mut overlay, w, h, (cx, cy), 8, [255, 255, 200], alpha * 0.7);
        }
        let overlay = blur_premul(&overlay, frame.width, frame.height, self.blur)?;
        over_in_place(&mut frame.data, &overlay, 1.0)
    }
}

/// Concentric dot: the ring between radii `r − 2` and `r` gets alpha `peak·r/max_r`.
fn dot(
    buf: &mut [u8],
    w: i64,
    h: i64,
    (cx, cy): (i64, i64),
    max_r: i64,
    rgb: [u8; 3],
    peak: f32,
) {
    for y in (cy - max_r).max(0)..(cy + max_r + 1).min(h) {
        for x in (cx - max_r).max(0)..(cx + max_r + 1).min(w) {
            let d2 = (x - cx).pow(2) + (y - cy).pow(2);
            let Some(r) = (2..=max_r).step_by(2).find(|r| d2 <= r * r) else {
                continue;
            };
            let a = (peak * r as f32 / max_r as f32).clamp(0.0, 255.0) as u8;
            let i = ((y * w + x) * 4) as usize;
            buf[i..i + 4].copy_from_slice(&premultiply([rgb[0], rgb[1], rgb[2], a]));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/edge_glow.rs"]
mod tests;
