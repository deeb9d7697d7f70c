use std::f64::consts::TAU;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};

/// Periodic phase of a looping animation with `total_frames` discrete steps.
///
/// The phase of frame `i` is `2π·i/N`, so every sinusoid derived from it is continuous across
/// the wrap from the last frame back to frame 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopPhase {
    total_frames: u32,
}

impl LoopPhase {
    /// Create a loop of `total_frames` frames; fewer than two frames cannot animate.
    pub fn new(total_frames: u32) -> WingbeatResult<Self> {
        if total_frames < 2 {
            return Err(WingbeatError::validation(format!(
                "total_frames must be >= 2, got {total_frames}"
            )));
        }
        Ok(Self { total_frames })
    }

    /// Number of frames in one loop.
    pub fn total_frames(self) -> u32 {
        self.total_frames
    }

    /// Reject frame indices outside `[0, total_frames)`.
    pub fn check(self, frame: FrameIndex) -> WingbeatResult<()> {
        if frame.0 >= self.total_frames {
            return Err(WingbeatError::validation(format!(
                "frame index {} is out of range for a {}-frame loop",
                frame.0, self.total_frames
            )));
        }
        Ok(())
    }

    /// Iterate all frame indices in playback order.
    pub fn frames(self) -> impl Iterator<Item = FrameIndex> {
        (0..self.total_frames).map(FrameIndex)
    }

    /// Normalized loop progress `i/N` in `[0, 1)`.
    pub fn progress(self, frame: FrameIndex) -> f64 {
        f64::from(frame.0) / f64::from(self.total_frames)
    }

    /// Phase angle `2π·i/N`.
    pub fn theta(self, frame: FrameIndex) -> f64 {
        self.theta_at(f64::from(frame.0))
    }

    /// Phase angle at a fractional (possibly out-of-loop) frame position.
    pub fn theta_at(self, position: f64) -> f64 {
        TAU * position / f64::from(self.total_frames)
    }

    /// `sin(θ)` for a frame.
    pub fn sine(self, frame: FrameIndex) -> f64 {
        self.theta(frame).sin()
    }

    /// `sin(θ)` at a fractional frame position, e.g. `total_frames` for the wrap-around.
    pub fn sine_at(self, position: f64) -> f64 {
        self.theta_at(position).sin()
    }

    /// Oscillating intensity `base + swing·sin(θ)`.
    pub fn pulse(self, frame: FrameIndex, base: f64, swing: f64) -> f64 {
        base + swing * self.sine(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/phase.rs"]
mod tests;
