use crate::foundation::math::to_u8;

/// Resampling kernel used when reading the source at fractional positions.
///
/// All kernels interpolate: at integral positions they return the source sample unchanged.
/// Higher orders are smoother but can ring around hard alpha edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Order 0, nearest sample.
    Nearest,
    /// Order 1, two taps.
    #[default]
    Linear,
    /// Order 3, four-tap Catmull-Rom.
    Cubic,
    /// Order 5, six-tap Lagrange.
    Quintic,
}

impl Interpolation {
    /// Polynomial order (0, 1, 3 or 5).
    pub fn order(self) -> u8 {
        match self {
            Self::Nearest => 0,
            Self::Linear => 1,
            Self::Cubic => 3,
            Self::Quintic => 5,
        }
    }

    /// Inverse of [`Interpolation::order`].
    pub fn from_order(order: u8) -> Option<Self> {
        match order {
            0 => Some(Self::Nearest),
            1 => Some(Self::Linear),
            3 => Some(Self::Cubic),
            5 => Some(Self::Quintic),
            _ => None,
        }
    }

    /// Tap weights for fractional offset `t` in `[0, 1)`.
    ///
    /// Returns the offset of the first tap relative to `floor(position)` and the number of taps
    /// written into `out`.
    pub(crate) fn weights(self, t: f32, out: &mut [f32; 6]) -> (i64, usize) {
        match self {
            Self::Nearest => {
                if t < 0.5 {
                    out[0] = 1.0;
                    (0, 1)
                } else {
                    out[0] = 1.0;
                    (1, 1)
                }
            }
            Self::Linear => {
                out[0] = 1.0 - t;
                out[1] = t;
                (0, 2)
            }
            Self::Cubic => {
                let t2 = t * t;
                let t3 = t2 * t;
                out[0] = 0.5 * (-t3 + 2.0 * t2 - t);
                out[1] = 0.5 * (3.0 * t3 - 5.0 * t2 + 2.0);
                out[2] = 0.5 * (-3.0 * t3 + 4.0 * t2 + t);
                out[3] = 0.5 * (t3 - t2);
                (-1, 4)
            }
            Self::Quintic => {
                for (k, w) in out.iter_mut().enumerate() {
                    let node_k = k as f32 - 2.0;
                    let mut acc = 1.0f32;
                    for j in 0..6 {
                        if j == k {
                            continue;
                        }
                        let node_j = j as f32 - 2.0;
                        acc *= (t - node_j) / (node_k - node_j);
                    }
                    *w = acc;
                }
                (-2, 6)
            }
        }
    }
}

/// How taps outside the raster are read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Positions clamp into `[0, len-1]` and taps repeat the edge pixel.
    #[default]
    Clamp,
    /// Everything outside the raster is transparent.
    Transparent,
}

/// Sample a line of `len` premultiplied pixels at fractional `pos`.
pub(crate) fn sample_line<F>(
    fetch: F,
    len: usize,
    pos: f64,
    interp: Interpolation,
    boundary: Boundary,
) -> [u8; 4]
where
    F: Fn(usize) -> [u8; 4],
{
    let last = len.saturating_sub(1) as i64;
    let pos = match boundary {
        Boundary::Clamp => pos.clamp(0.0, last as f64),
        Boundary::Transparent => {
            if pos <= -1.0 || pos >= len as f64 {
                return [0; 4];
            }
            pos
        }
    };

    let tap = |i: i64| -> [u8; 4] {
        if (0..=last).contains(&i) {
            fetch(i as usize)
        } else {
            match boundary {
                Boundary::Clamp => fetch(i.clamp(0, last) as usize),
                Boundary::Transparent => [0; 4],
            }
        }
    };

    let base = pos.floor();
    let t = (pos - base) as f32;
    let base = base as i64;
    if t == 0.0 {
        return tap(base);
    }

    let mut weights = [0f32; 6];
    let (first, count) = interp.weights(t, &mut weights);
    if count == 1 {
        return tap(base + first);
    }

    let mut acc = [0f32; 4];
    for (k, &w) in weights[..count].iter().enumerate() {
        let px = tap(base + first + k as i64);
        for c in 0..4 {
            acc[c] += w * f32::from(px[c]);
        }
    }

    let a = to_u8(acc[3]);
    [
        to_u8(acc[0]).min(a),
        to_u8(acc[1]).min(a),
        to_u8(acc[2]).min(a),
        a,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/displace/kernel.rs"]
mod tests;
