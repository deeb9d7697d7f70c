use crate::animation::phase::LoopPhase;
use crate::effects::enhance::Enhance;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};

/// Short lightning flash inside a window of the loop cycle.
///
/// The flash ramps linearly from nothing at `start` to full strength at the window center and
/// back to nothing at `end`. At full strength brightness and contrast rise by the configured
/// fractions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Flash {
    /// Window start as a fraction of the cycle.
    pub start: f32,
    /// Window end as a fraction of the cycle.
    pub end: f32,
    /// Peak brightness gain (`0.5` = +50 %).
    pub brightness: f32,
    /// Peak contrast gain.
    pub contrast: f32,
}

impl Default for Flash {
    fn default() -> Self {
        Self {
            start: 0.93,
            end: 0.97,
            brightness: 0.5,
            contrast: 0.2,
        }
    }
}

impl Flash {
    pub(crate) fn validate(&self) -> WingbeatResult<()> {
        if !(self.start.is_finite() && self.end.is_finite())
            || !(0.0..=1.0).contains(&self.start)
            || !(0.0..=1.0).contains(&self.end)
            || self.start >= self.end
        {
            return Err(WingbeatError::validation(
                "flash window must satisfy 0 <= start < end <= 1",
            ));
        }
        if !self.brightness.is_finite()
            || !self.contrast.is_finite()
            || self.brightness < 0.0
            || self.contrast < 0.0
        {
            return Err(WingbeatError::validation(
                "flash gains must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Flash strength in `[0, 1]` for a frame.
    pub fn strength(&self, phase: LoopPhase, frame: FrameIndex) -> f32 {
        let pos = phase.progress(frame) as f32;
        if pos < self.start || pos > self.end {
            return 0.0;
        }
        let half = (self.end - self.start) / 2.0;
        let mid = self.start + half;
        let s = if pos <= mid {
            (pos - self.start) / half
        } else {
            (self.end - pos) / half
        };
        s.clamp(0.0, 1.0)
    }

    pub(crate) fn apply(&self, data: &mut [u8], phase: LoopPhase, frame: FrameIndex) {
        let s = self.strength(phase, frame);
        if s <= 0.0 {
            return;
        }
        tracing::debug!(frame = frame.0, strength = s, "flash");
        Enhance::new(1.0 + self.brightness * s, 1.0, 1.0 + self.contrast * s).apply_premul(data);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/flash.rs"]
mod tests;
