use rayon::prelude::*;

use crate::displace::field::Axis;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::foundation::math::fraction_px;

/// Strategy deciding how strongly a pixel follows the global displacement.
///
/// Implementations return a participation factor in `[0, 1]`; `0` keeps the pixel static.
pub trait RegionWeight: Sync {
    /// Weight of pixel `(x, y)` in a `width`×`height` image.
    fn weight(&self, x: u32, y: u32, width: u32, height: u32) -> f32;
}

impl<F> RegionWeight for F
where
    F: Fn(u32, u32, u32, u32) -> f32 + Sync,
{
    fn weight(&self, x: u32, y: u32, width: u32, height: u32) -> f32 {
        self(x, y, width, height)
    }
}

/// Shape of the ramp from a static boundary (`t = 0`) to full motion (`t = 1`).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Taper {
    /// `t`.
    #[default]
    Linear,
    /// `t^exponent`.
    Power {
        /// Exponent, finite and > 0.
        exponent: f32,
    },
    /// Hermite smoothstep.
    Smooth,
}

impl Taper {
    /// Map ramp position `t` (clamped to `[0, 1]`) to a weight.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power { exponent } => t.powf(exponent),
            Self::Smooth => t * t * (3.0 - 2.0 * t),
        }
    }

    fn validate(self) -> WingbeatResult<()> {
        if let Self::Power { exponent } = self
            && (!exponent.is_finite() || exponent <= 0.0)
        {
            return Err(WingbeatError::validation(
                "taper exponent must be finite and > 0",
            ));
        }
        Ok(())
    }
}

/// Left/right "wing" regions flanking a static body.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WingRegion {
    /// Left wing spans `[0, left_end·W)`; weight 1 at the outer edge, 0 at the boundary.
    #[serde(default = "default_left_end")]
    pub left_end: f32,
    /// Right wing spans `(right_start·W, W)`; weight 0 at the boundary, 1 at the outer edge.
    #[serde(default = "default_right_start")]
    pub right_start: f32,
    /// Horizontal ramp shape.
    #[serde(default)]
    pub taper: Taper,
    /// Rows above `lower_start·H` stay static; below it motion ramps toward the bottom.
    #[serde(default)]
    pub lower_start: Option<f32>,
    /// Vertical ramp shape, only used with `lower_start`.
    #[serde(default)]
    pub vertical_taper: Taper,
    /// Peak weight of a triangular sway across the body, `0` for a rigid body.
    #[serde(default)]
    pub body_flex: f32,
}

fn default_left_end() -> f32 {
    0.30
}

fn default_right_start() -> f32 {
    0.70
}

impl Default for WingRegion {
    fn default() -> Self {
        Self {
            left_end: default_left_end(),
            right_start: default_right_start(),
            taper: Taper::Linear,
            lower_start: None,
            vertical_taper: Taper::Linear,
            body_flex: 0.0,
        }
    }
}

impl WingRegion {
    fn validate(&self) -> WingbeatResult<()> {
        check_fraction("wings.left_end", self.left_end)?;
        check_fraction("wings.right_start", self.right_start)?;
        if self.left_end > self.right_start {
            return Err(WingbeatError::validation(
                "wings.left_end must be <= wings.right_start",
            ));
        }
        if let Some(lower) = self.lower_start {
            check_fraction("wings.lower_start", lower)?;
            if lower >= 1.0 {
                return Err(WingbeatError::validation("wings.lower_start must be < 1"));
            }
        }
        check_fraction("wings.body_flex", self.body_flex)?;
        self.taper.validate()?;
        self.vertical_taper.validate()
    }

    fn horizontal(&self, x: u32, width: u32) -> f32 {
        let left = fraction_px(self.left_end, width);
        let right = fraction_px(self.right_start, width);
        let xf = x as f32;
        if xf < left {
            self.taper.apply(1.0 - xf / left)
        } else if xf > right {
            self.taper.apply((xf - right) / (width as f32 - right))
        } else if self.body_flex > 0.0 && right > left {
            let center_pos = (xf - left) / (right - left);
            self.body_flex * (1.0 - (center_pos - 0.5).abs() * 2.0)
        } else {
            0.0
        }
    }

    fn vertical(&self, y: u32, height: u32) -> f32 {
        let Some(lower) = self.lower_start else {
            return 1.0;
        };
        let top = fraction_px(lower, height);
        let yf = y as f32;
        if yf < top {
            return 0.0;
        }
        self.vertical_taper.apply((yf - top) / (height as f32 - top))
    }
}

/// Serializable catalogue of built-in region weights.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionSpec {
    /// Every pixel moves with full amplitude.
    Uniform,
    /// Columns in `[from·W, to·W)` move with full amplitude, everything else is static.
    Columns {
        /// Start fraction (inclusive).
        from: f32,
        /// End fraction (exclusive).
        to: f32,
    },
    /// Tapered wings around a static body.
    Wings(WingRegion),
    /// Gaussian band across `axis`, centered at fraction `center` with width `sigma` (fraction).
    GaussianBand {
        /// Axis the band position is measured along.
        axis: Axis,
        /// Band center as a fraction of the axis length.
        center: f32,
        /// Standard deviation as a fraction of the axis length.
        sigma: f32,
    },
}

impl Default for RegionSpec {
    fn default() -> Self {
        Self::Wings(WingRegion::default())
    }
}

impl RegionSpec {
    /// Check fractions and curve parameters.
    pub fn validate(&self) -> WingbeatResult<()> {
        match self {
            Self::Uniform => Ok(()),
            Self::Columns { from, to } => {
                check_fraction("columns.from", *from)?;
                check_fraction("columns.to", *to)?;
                if from > to {
                    return Err(WingbeatError::validation("columns.from must be <= columns.to"));
                }
                Ok(())
            }
            Self::Wings(w) => w.validate(),
            Self::GaussianBand { center, sigma, .. } => {
                check_fraction("gaussian_band.center", *center)?;
                if !sigma.is_finite() || *sigma <= 0.0 {
                    return Err(WingbeatError::validation(
                        "gaussian_band.sigma must be finite and > 0",
                    ));
                }
                Ok(())
            }
        }
    }
}

impl RegionWeight for RegionSpec {
    fn weight(&self, x: u32, y: u32, width: u32, height: u32) -> f32 {
        match self {
            Self::Uniform => 1.0,
            Self::Columns { from, to } => {
                let xf = x as f32;
                if xf >= fraction_px(*from, width) && xf < fraction_px(*to, width) {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Wings(w) => {
                let h = w.horizontal(x, width);
                if h <= 0.0 { 0.0 } else { h * w.vertical(y, height) }
            }
            Self::GaussianBand {
                axis,
                center,
                sigma,
            } => {
                let p = match axis {
                    Axis::Vertical => y as f32 / height as f32,
                    Axis::Horizontal => x as f32 / width as f32,
                };
                let d = p - center;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            }
        }
    }
}

fn check_fraction(name: &str, v: f32) -> WingbeatResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(WingbeatError::validation(format!(
            "{name} must be a fraction in [0, 1], got {v}"
        )));
    }
    Ok(())
}

/// Region weights materialized for one raster size, reused for every frame of a loop.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMap {
    width: u32,
    height: u32,
    weights: Vec<f32>,
}

impl WeightMap {
    /// Evaluate `region` for every pixel.
    ///
    /// Finite weights are clamped into `[0, 1]`; a non-finite weight is an error.
    pub fn sample(width: u32, height: u32, region: &dyn RegionWeight) -> WingbeatResult<Self> {
        let mut weights = vec![0f32; (width as usize) * (height as usize)];
        weights
            .par_chunks_mut(width.max(1) as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, w) in row.iter_mut().enumerate() {
                    *w = region.weight(x as u32, y as u32, width, height);
                }
            });

        if let Some(pos) = weights.iter().position(|w| !w.is_finite()) {
            let w = width.max(1) as usize;
            return Err(WingbeatError::validation(format!(
                "region weight at ({}, {}) is not finite",
                pos % w,
                pos / w
            )));
        }
        for w in &mut weights {
            *w = w.clamp(0.0, 1.0);
        }
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Weight at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.weights[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Row-major weights.
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }

    /// Map width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` when no pixel participates in the motion.
    pub fn is_static(&self) -> bool {
        self.weights.iter().all(|&w| w == 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/displace/weight.rs"]
mod tests;
