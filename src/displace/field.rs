use rayon::prelude::*;

use crate::animation::phase::LoopPhase;
use crate::displace::kernel::{Boundary, Interpolation, sample_line};
use crate::displace::weight::WeightMap;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::WingbeatResult;

/// Offsets smaller than this are treated as exactly zero.
pub const ZERO_EPSILON: f64 = 1e-9;

/// Image axis along which pixels are displaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Output `(x, y)` samples the source at `(x, y + Δ)`.
    #[default]
    Vertical,
    /// Output `(x, y)` samples the source at `(x + Δ, y)`.
    Horizontal,
}

/// Dense per-pixel offsets for one frame: `Δ(x, y) = d · w(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementField {
    width: u32,
    height: u32,
    axis: Axis,
    offsets: Vec<f32>,
}

impl DisplacementField {
    /// Scale a weight map by the scalar displacement `d`.
    pub fn from_weights(weights: &WeightMap, displacement: f64, axis: Axis) -> Self {
        let d = if displacement.abs() < ZERO_EPSILON {
            0.0
        } else {
            displacement
        };
        let offsets = weights
            .as_slice()
            .iter()
            .map(|&w| {
                let o = d * f64::from(w);
                if o.abs() < ZERO_EPSILON { 0.0 } else { o as f32 }
            })
            .collect();
        Self {
            width: weights.width(),
            height: weights.height(),
            axis,
            offsets,
        }
    }

    /// Field of frame `frame`: `d = amplitude_px · sin(2π·i/N)`.
    pub fn for_frame(
        phase: LoopPhase,
        frame: FrameIndex,
        amplitude_px: f64,
        weights: &WeightMap,
        axis: Axis,
    ) -> WingbeatResult<Self> {
        phase.check(frame)?;
        Ok(Self::from_weights(
            weights,
            amplitude_px * phase.sine(frame),
            axis,
        ))
    }

    /// Offset of pixel `(x, y)` in pixels.
    pub fn offset(&self, x: u32, y: u32) -> f32 {
        self.offsets[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Displaced axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Largest absolute offset.
    pub fn max_abs(&self) -> f32 {
        self.offsets.iter().fold(0.0f32, |m, o| m.max(o.abs()))
    }

    /// `true` when no pixel moves.
    pub fn is_zero(&self) -> bool {
        self.offsets.iter().all(|&o| o == 0.0)
    }

    /// Resample a premultiplied RGBA8 buffer through this field.
    ///
    /// Zero-offset pixels are copied from `src` without touching the kernel.
    pub fn resample(
        &self,
        src: &[u8],
        interp: Interpolation,
        boundary: Boundary,
    ) -> WingbeatResult<Vec<u8>> {
        let canvas = Canvas::new(self.width, self.height)?;
        canvas.check_rgba8(src)?;

        let w = self.width as usize;
        let h = self.height as usize;
        let px_at = |x: usize, y: usize| -> [u8; 4] {
            let i = (y * w + x) * 4;
            [src[i], src[i + 1], src[i + 2], src[i + 3]]
        };

        let mut out = vec![0u8; src.len()];
        out.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
            for x in 0..w {
                let off = self.offsets[y * w + x];
                let px = if off == 0.0 {
                    px_at(x, y)
                } else {
                    match self.axis {
                        Axis::Vertical => sample_line(
                            |i| px_at(x, i),
                            h,
                            y as f64 + f64::from(off),
                            interp,
                            boundary,
                        ),
                        Axis::Horizontal => sample_line(
                            |i| px_at(i, y),
                            w,
                            x as f64 + f64::from(off),
                            interp,
                            boundary,
                        ),
                    }
                };
                row[x * 4..x * 4 + 4].copy_from_slice(&px);
            }
        });
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/displace/field.rs"]
mod tests;
