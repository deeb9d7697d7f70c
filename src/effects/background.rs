use crate::assets::decode::SourceImage;
use crate::foundation::color::mean_rgb;
use crate::foundation::error::{WingbeatError, WingbeatResult};

/// Heuristic light-background removal for decorative frames.
///
/// Bright opaque pixels (the glowing border) are darkened first so they survive; afterwards every
/// pixel whose channel mean is above `threshold` becomes fully transparent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Cutout {
    /// Channel-mean threshold above which a pixel counts as background.
    pub threshold: f32,
    /// Factor applied to bright opaque pixels before thresholding (`1` disables darkening).
    pub darken: f32,
    /// Channel mean above which an opaque pixel counts as bright.
    pub bright_mean: f32,
    /// Alpha above which a pixel counts as opaque.
    pub opaque_alpha: u8,
}

impl Default for Cutout {
    fn default() -> Self {
        Self {
            threshold: 240.0,
            darken: 0.65,
            bright_mean: 200.0,
            opaque_alpha: 50,
        }
    }
}

impl Cutout {
    /// Threshold and darkening factor must be in range.
    pub fn validate(&self) -> WingbeatResult<()> {
        if !self.threshold.is_finite() || !(0.0..=255.0).contains(&self.threshold) {
            return Err(WingbeatError::validation(
                "cutout.threshold must be in [0, 255]",
            ));
        }
        if !self.bright_mean.is_finite() || !(0.0..=255.0).contains(&self.bright_mean) {
            return Err(WingbeatError::validation(
                "cutout.bright_mean must be in [0, 255]",
            ));
        }
        if !self.darken.is_finite() || !(0.0..=1.0).contains(&self.darken) {
            return Err(WingbeatError::validation("cutout.darken must be in [0, 1]"));
        }
        Ok(())
    }

    /// Apply to one straight-alpha pixel.
    pub fn apply_pixel(&self, px: [u8; 4]) -> [u8; 4] {
        let [mut r, mut g, mut b, mut a] = px;
        if a > self.opaque_alpha && mean_rgb([r, g, b]) > self.bright_mean {
            let dim = |c: u8| (f32::from(c) * self.darken) as u8;
            (r, g, b) = (dim(r), dim(g), dim(b));
        }
        if mean_rgb([r, g, b]) > self.threshold {
            a = 0;
        }
        [r, g, b, a]
    }

    /// Cut out a straight-alpha RGBA image.
    pub fn apply_rgba(&self, img: &mut image::RgbaImage) {
        for px in img.pixels_mut() {
            px.0 = self.apply_pixel(px.0);
        }
    }

    /// Cut out a source, returning a new source.
    #[tracing::instrument(skip_all, fields(width = src.width, height = src.height))]
    pub fn apply(&self, src: &SourceImage) -> WingbeatResult<SourceImage> {
        let mut removed = 0usize;
        let data = src
            .rgba8_straight
            .chunks_exact(4)
            .flat_map(|px| {
                let straight = [px[0], px[1], px[2], px[3]];
                let out = self.apply_pixel(straight);
                if out[3] == 0 && straight[3] != 0 {
                    removed += 1;
                }
                out
            })
            .collect();
        tracing::debug!(removed, "cutout");
        SourceImage::from_straight(src.width, src.height, data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/background.rs"]
mod tests;
