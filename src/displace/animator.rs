use crate::animation::phase::LoopPhase;
use crate::assets::decode::SourceImage;
use crate::displace::field::{Axis, DisplacementField, ZERO_EPSILON};
use crate::displace::kernel::{Boundary, Interpolation};
use crate::displace::weight::{RegionWeight, WeightMap};
use crate::effects::composite::{mix_by_weight, over_in_place};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::render::frame::FrameRGBA;

/// How a resampled image becomes the output frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layering {
    /// The clamped resample is the frame.
    #[default]
    Direct,
    /// `source·(1−w) + resampled·w`.
    Blend,
    /// Pixels with `w > 0` are lifted into their own layer, displaced with a transparent
    /// boundary and composited over the remaining static pixels.
    Extract,
}

impl Layering {
    fn boundary(self) -> Boundary {
        match self {
            Self::Direct | Self::Blend => Boundary::Clamp,
            Self::Extract => Boundary::Transparent,
        }
    }
}

/// Motion parameters of one flap loop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlapParams {
    /// Peak displacement in pixels.
    pub amplitude_px: f64,
    /// Displaced axis.
    pub axis: Axis,
    /// Resampling kernel.
    pub interpolation: Interpolation,
    /// Frame assembly.
    pub layering: Layering,
}

impl Default for FlapParams {
    fn default() -> Self {
        Self {
            amplitude_px: 10.0,
            axis: Axis::Vertical,
            interpolation: Interpolation::Linear,
            layering: Layering::Direct,
        }
    }
}

impl FlapParams {
    /// Reject negative or non-finite amplitudes.
    pub fn validate(&self) -> WingbeatResult<()> {
        if !self.amplitude_px.is_finite() || self.amplitude_px < 0.0 {
            return Err(WingbeatError::validation(format!(
                "amplitude_px must be finite and >= 0, got {}",
                self.amplitude_px
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct ExtractedLayers {
    base: Vec<u8>,
    moving: Vec<u8>,
}

impl ExtractedLayers {
    fn split(src: &[u8], weights: &WeightMap) -> Self {
        let mut base = src.to_vec();
        let mut moving = vec![0u8; src.len()];
        for (i, &w) in weights.as_slice().iter().enumerate() {
            if w > 0.0 {
                let px = i * 4;
                moving[px..px + 4].copy_from_slice(&src[px..px + 4]);
                base[px..px + 4].fill(0);
            }
        }
        Self { base, moving }
    }
}

/// Renders the frames of one flap loop over a fixed source.
///
/// The weight map (and, for [`Layering::Extract`], the split layers) are computed once and
/// reused for every frame.
#[derive(Debug)]
pub struct DisplacementAnimator {
    source: SourceImage,
    phase: LoopPhase,
    params: FlapParams,
    weights: WeightMap,
    layers: Option<ExtractedLayers>,
}

impl DisplacementAnimator {
    /// Validate inputs and precompute per-loop state.
    pub fn new(
        source: &SourceImage,
        total_frames: u32,
        params: FlapParams,
        region: &dyn RegionWeight,
    ) -> WingbeatResult<Self> {
        let phase = LoopPhase::new(total_frames)?;
        params.validate()?;
        source.canvas().check_rgba8(&source.rgba8_premul)?;

        let weights = WeightMap::sample(source.width, source.height, region)?;
        let layers = (params.layering == Layering::Extract)
            .then(|| ExtractedLayers::split(&source.rgba8_premul, &weights));

        Ok(Self {
            source: source.clone(),
            phase,
            params,
            weights,
            layers,
        })
    }

    /// Loop phase.
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Motion parameters.
    pub fn params(&self) -> &FlapParams {
        &self.params
    }

    /// Per-pixel region weights.
    pub fn weights(&self) -> &WeightMap {
        &self.weights
    }

    /// Source raster.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// Scalar displacement `d = amplitude·sin(2π·i/N)` of a frame.
    pub fn displacement(&self, frame: FrameIndex) -> WingbeatResult<f64> {
        self.phase.check(frame)?;
        let d = self.params.amplitude_px * self.phase.sine(frame);
        Ok(if d.abs() < ZERO_EPSILON { 0.0 } else { d })
    }

    /// Per-pixel offsets of a frame.
    pub fn field(&self, frame: FrameIndex) -> WingbeatResult<DisplacementField> {
        DisplacementField::for_frame(
            self.phase,
            frame,
            self.params.amplitude_px,
            &self.weights,
            self.params.axis,
        )
    }

    /// Render one frame.
    #[tracing::instrument(skip(self))]
    pub fn render(&self, frame: FrameIndex) -> WingbeatResult<FrameRGBA> {
        let field = self.field(frame)?;
        if field.is_zero() {
            return Ok(FrameRGBA::from_source(&self.source));
        }

        let interp = self.params.interpolation;
        let boundary = self.params.layering.boundary();
        let src = self.source.rgba8_premul.as_slice();
        let data = match (self.params.layering, &self.layers) {
            (Layering::Direct, _) => field.resample(src, interp, boundary)?,
            (Layering::Blend, _) => {
                let moved = field.resample(src, interp, boundary)?;
                let mut out = vec![0u8; src.len()];
                mix_by_weight(src, &moved, self.weights.as_slice(), &mut out)?;
                out
            }
            (Layering::Extract, Some(layers)) => {
                let moved = field.resample(&layers.moving, interp, boundary)?;
                let mut out = layers.base.clone();
                over_in_place(&mut out, &moved, 1.0)?;
                out
            }
            (Layering::Extract, None) => {
                return Err(WingbeatError::validation(
                    "extract layering requires split layers",
                ));
            }
        };

        tracing::debug!(max_offset = field.max_abs(), "displaced frame");
        Ok(FrameRGBA::from_premul(self.source.width, self.source.height, data)?
            .with_straight_source(&self.source))
    }
}

/// Render frame `frame_index` of a `total_frames` flap loop over `image`.
///
/// All parameters are validated before any pixel work.
pub fn displace_frame(
    image: &SourceImage,
    frame_index: FrameIndex,
    total_frames: u32,
    params: &FlapParams,
    region: &dyn RegionWeight,
) -> WingbeatResult<FrameRGBA> {
    LoopPhase::new(total_frames)?.check(frame_index)?;
    DisplacementAnimator::new(image, total_frames, *params, region)?.render(frame_index)
}

#[cfg(test)]
#[path = "../../tests/unit/displace/animator.rs"]
mod tests;
