use std::f32::consts::{PI, TAU};

use rayon::prelude::*;

use crate::animation::phase::LoopPhase;
use crate::effects::enhance::boost_premul;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::render::frame::FrameRGBA;

const VISIBLE_ALPHA: u8 = 10;

/// Lightning arc circling the image center once per loop.
///
/// A pixel whose polar angle lies within `arc_deg` degrees of the arc head is boosted with
/// intensity `(1 − Δangle/arc)²`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Orbit {
    /// Angular half-width of the arc in degrees.
    pub arc_deg: f32,
    /// Brightness gain at the arc head.
    pub brightness: f32,
    /// Contrast gain at the arc head.
    pub contrast: f32,
    /// Intensities at or below this are ignored.
    pub threshold: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            arc_deg: 100.0,
            brightness: 0.7,
            contrast: 0.35,
            threshold: 0.08,
        }
    }
}

impl Orbit {
    pub(crate) fn validate(&self) -> WingbeatResult<()> {
        if !self.arc_deg.is_finite() || self.arc_deg <= 0.0 || self.arc_deg > 180.0 {
            return Err(WingbeatError::validation("orbit.arc_deg must be in (0, 180]"));
        }
        if ![self.brightness, self.contrast, self.threshold]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
        {
            return Err(WingbeatError::validation(
                "orbit gains must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Intensity at polar angle `angle` (radians) when the arc head sits at `head`.
    pub fn intensity(&self, head: f32, angle: f32) -> f32 {
        let mut diff = (head - angle) % TAU;
        if diff > PI {
            diff -= TAU;
        } else if diff < -PI {
            diff += TAU;
        }
        let dist = diff.abs().to_degrees();
        if dist >= self.arc_deg {
            return 0.0;
        }
        let k = 1.0 - dist / self.arc_deg;
        k * k
    }

    pub(crate) fn apply(&self, frame: &mut FrameRGBA, phase: LoopPhase, idx: FrameIndex) {
        let head = phase.theta(idx) as f32;
        let cx = frame.width as f32 / 2.0;
        let cy = frame.height as f32 / 2.0;
        let row_len = frame.width as usize * 4;
        frame
            .data
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                let dy = y as f32 - cy;
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    if px[3] <= VISIBLE_ALPHA {
                        continue;
                    }
                    let angle = dy.atan2(x as f32 - cx);
                    let k = self.intensity(head, angle);
                    if k > self.threshold {
                        boost_premul(px, 1.0 + self.brightness * k, 1.0 + self.contrast * k);
                    }
                }
            });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/orbit.rs"]
mod tests;
