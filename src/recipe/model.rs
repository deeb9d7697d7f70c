use crate::animation::phase::LoopPhase;
use crate::displace::animator::{FlapParams, Layering};
use crate::displace::field::Axis;
use crate::displace::kernel::Interpolation;
use crate::displace::weight::RegionSpec;
use crate::effects::EffectSpec;
use crate::effects::background::Cutout;
use crate::effects::enhance::Enhance;
use crate::encode::OutputFormat;
use crate::foundation::error::{WingbeatError, WingbeatResult};

/// Complete description of one looping animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Recipe {
    /// Frames per loop.
    pub num_frames: u32,
    /// Display duration of each frame in milliseconds.
    pub duration_ms: u32,
    /// Container loop count, `0` = infinite.
    pub loop_count: u16,
    /// Output container; inferred from the output extension when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Straight RGBA background the frames are flattened onto; `None` keeps alpha.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<[u8; 4]>,
    /// Reject sources that were decoded without an alpha channel.
    pub require_alpha: bool,
    /// Background removal applied once to the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutout: Option<Cutout>,
    /// Color adjustment applied once to the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjust: Option<Enhance>,
    /// Wing flap; `null` renders the static source under the effects.
    pub flap: Option<FlapSpec>,
    /// Per-frame effects, applied in order after the flap.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectSpec>,
}

impl Default for Recipe {
    fn default() -> Self {
        Self {
            num_frames: 36,
            duration_ms: 55,
            loop_count: 0,
            format: None,
            background: None,
            require_alpha: false,
            cutout: None,
            adjust: None,
            flap: Some(FlapSpec::default()),
            effects: Vec::new(),
        }
    }
}

impl Recipe {
    /// Parse a recipe from JSON.
    pub fn from_json(s: &str) -> WingbeatResult<Self> {
        serde_json::from_str(s).map_err(|e| WingbeatError::serde(e.to_string()))
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> WingbeatResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WingbeatError::serde(e.to_string()))
    }

    /// Check every numeric constraint.
    pub fn validate(&self) -> WingbeatResult<()> {
        LoopPhase::new(self.num_frames)?;
        if self.duration_ms == 0 {
            return Err(WingbeatError::validation("duration_ms must be >= 1"));
        }
        if let Some(c) = &self.cutout {
            c.validate()?;
        }
        if let Some(a) = &self.adjust {
            a.validate()?;
        }
        if let Some(f) = &self.flap {
            f.validate()?;
        }
        for e in &self.effects {
            e.validate()?;
        }
        Ok(())
    }
}

/// Wing-flap settings: motion parameters plus the region that moves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlapSpec {
    /// Peak displacement in pixels.
    pub amplitude_px: f64,
    /// Displaced axis.
    pub axis: Axis,
    /// Resampling kernel.
    pub interpolation: Interpolation,
    /// Frame assembly.
    pub layering: Layering,
    /// Moving region.
    pub region: RegionSpec,
}

impl Default for FlapSpec {
    fn default() -> Self {
        let p = FlapParams::default();
        Self {
            amplitude_px: p.amplitude_px,
            axis: p.axis,
            interpolation: p.interpolation,
            layering: p.layering,
            region: RegionSpec::default(),
        }
    }
}

impl FlapSpec {
    /// Motion parameters for the animator.
    pub fn params(&self) -> FlapParams {
        FlapParams {
            amplitude_px: self.amplitude_px,
            axis: self.axis,
            interpolation: self.interpolation,
            layering: self.layering,
        }
    }

    /// Check amplitude and region.
    pub fn validate(&self) -> WingbeatResult<()> {
        self.params().validate()?;
        self.region.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/recipe/model.rs"]
mod tests;
