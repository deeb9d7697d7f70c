//! Per-frame overlays and one-off source adjustments.

use crate::animation::phase::LoopPhase;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::WingbeatResult;
use crate::render::frame::FrameRGBA;

/// Light-background removal.
pub mod background;
/// Gaussian blur.
pub mod blur;
/// Premultiplied compositing.
pub mod composite;
/// Border glow and sparkles.
pub mod edge_glow;
/// Brightness/saturation/contrast.
pub mod enhance;
/// Cycle-window lightning flash.
pub mod flash;
/// Orbiting lightning arc.
pub mod orbit;
/// Travelling band.
pub mod sweep;

use edge_glow::{EdgeGlow, Sparkles};
use flash::Flash;
use orbit::Orbit;
use sweep::Sweep;

/// An effect applied to each rendered frame after displacement.
pub trait FrameEffect: Send + Sync {
    /// Modify `frame` (premultiplied) for loop position `idx`.
    fn apply(&self, frame: &mut FrameRGBA, phase: LoopPhase, idx: FrameIndex)
    -> WingbeatResult<()>;
}

/// Serializable per-frame effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectSpec {
    /// Lightning flash near the end of the cycle.
    Flash(Flash),
    /// Band travelling bottom to top.
    Sweep(Sweep),
    /// Lightning arc orbiting the center.
    Orbit(Orbit),
    /// Pulsing border glow.
    EdgeGlow(EdgeGlow),
    /// Corner and edge twinkles.
    Sparkles(Sparkles),
}

impl EffectSpec {
    /// Check parameters before any frame is rendered.
    pub fn validate(&self) -> WingbeatResult<()> {
        match self {
            Self::Flash(e) => e.validate(),
            Self::Sweep(e) => e.validate(),
            Self::Orbit(e) => e.validate(),
            Self::EdgeGlow(e) => e.validate(),
            Self::Sparkles(e) => e.validate(),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flash(_) => "flash",
            Self::Sweep(_) => "sweep",
            Self::Orbit(_) => "orbit",
            Self::EdgeGlow(_) => "edge_glow",
            Self::Sparkles(_) => "sparkles",
        }
    }
}

impl FrameEffect for EffectSpec {
    fn apply(
        &self,
        frame: &mut FrameRGBA,
        phase: LoopPhase,
        idx: FrameIndex,
    ) -> WingbeatResult<()> {
        match self {
            Self::Flash(e) => {
                e.apply(&mut frame.data, phase, idx);
                Ok(())
            }
            Self::Sweep(e) => e.apply(frame, phase, idx),
            Self::Orbit(e) => {
                e.apply(frame, phase, idx);
                Ok(())
            }
            Self::EdgeGlow(e) => e.apply(frame, phase, idx),
            Self::Sparkles(e) => e.apply(frame, phase, idx),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mod.rs"]
mod tests;
