use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::color::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::foundation::core::Canvas;
use crate::foundation::error::{WingbeatError, WingbeatResult};

/// Decoded source raster, read once and never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Straight-alpha RGBA8 as decoded; premultiplying it yields `rgba8_premul`.
    pub rgba8_straight: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap an already premultiplied RGBA8 buffer.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> WingbeatResult<Self> {
        Canvas::new(width, height)?.check_rgba8(&rgba8_premul)?;
        let mut straight = rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            rgba8_straight: Arc::new(straight),
        })
    }

    /// Wrap a straight-alpha RGBA8 buffer, keeping it byte-for-byte for output.
    pub fn from_straight(width: u32, height: u32, rgba8_straight: Vec<u8>) -> WingbeatResult<Self> {
        Canvas::new(width, height)?.check_rgba8(&rgba8_straight)?;
        let mut premul = rgba8_straight.clone();
        premultiply_rgba8_in_place(&mut premul);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(premul),
            rgba8_straight: Arc::new(rgba8_straight),
        })
    }

    /// Build from a straight-alpha `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> WingbeatResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_straight(width, height, img.into_raw())
    }

    /// Raster dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let d = &self.rgba8_premul;
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }

    /// Straight-alpha copy for encoders and PNG output.
    pub fn to_rgba_image(&self) -> WingbeatResult<image::RgbaImage> {
        let data = self.rgba8_straight.as_ref().clone();
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| WingbeatError::shape("rgba8 buffer does not match dimensions"))
    }
}

/// What to do with sources that were decoded without an alpha channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlphaPolicy {
    /// Promote to RGBA with an opaque alpha channel.
    #[default]
    Promote,
    /// Reject the source before any processing.
    Require,
}

/// Decode PNG/WebP/GIF/... bytes into a premultiplied [`SourceImage`].
pub fn decode_image(bytes: &[u8], alpha: AlphaPolicy) -> WingbeatResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    if alpha == AlphaPolicy::Require && !dyn_img.color().has_alpha() {
        return Err(WingbeatError::shape(format!(
            "source has no alpha channel (color type {:?})",
            dyn_img.color()
        )));
    }
    SourceImage::from_rgba_image(dyn_img.to_rgba8())
}

/// Read and decode an image file.
pub fn load_image(path: &Path, alpha: AlphaPolicy) -> WingbeatResult<SourceImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read source image '{}'", path.display()))?;
    let img = decode_image(&bytes, alpha)?;
    tracing::debug!(
        path = %path.display(),
        width = img.width,
        height = img.height,
        "loaded source image"
    );
    Ok(img)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
