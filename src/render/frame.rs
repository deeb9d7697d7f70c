use std::sync::Arc;

use crate::assets::decode::SourceImage;
use crate::effects::composite::flatten_over_bg;
use crate::foundation::color::{premultiply, unpremultiply, unpremultiply_rgba8_in_place};
use crate::foundation::core::Canvas;
use crate::foundation::error::{WingbeatError, WingbeatResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** while they move through the pipeline. The `premultiplied`
/// flag makes the representation explicit at encoder boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
    /// Straight bytes of the source the frame was rendered from.
    straight_source: Option<Arc<Vec<u8>>>,
}

impl FrameRGBA {
    /// Wrap a premultiplied buffer after checking its length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> WingbeatResult<Self> {
        Canvas::new(width, height)?.check_rgba8(&data)?;
        Ok(Self {
            width,
            height,
            data,
            premultiplied: true,
            straight_source: None,
        })
    }

    /// Copy of the source raster.
    pub fn from_source(src: &SourceImage) -> Self {
        Self {
            width: src.width,
            height: src.height,
            data: src.rgba8_premul.as_ref().clone(),
            premultiplied: true,
            straight_source: Some(Arc::clone(&src.rgba8_straight)),
        }
    }

    /// Remember `src` so pixels still equal to it are emitted with its exact straight bytes.
    pub(crate) fn with_straight_source(mut self, src: &SourceImage) -> Self {
        if src.rgba8_straight.len() == self.data.len() {
            self.straight_source = Some(Arc::clone(&src.rgba8_straight));
        }
        self
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)` in the frame's own representation.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Straight-alpha bytes for encoders that expect unassociated alpha.
    ///
    /// Pixels that still premultiply to the source value are copied from the source, so
    /// untouched regions come out bit-identical even at low alpha.
    pub fn to_straight(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        let Some(straight) = &self.straight_source else {
            unpremultiply_rgba8_in_place(&mut out);
            return out;
        };
        for (px, orig) in out.chunks_exact_mut(4).zip(straight.chunks_exact(4)) {
            let orig = [orig[0], orig[1], orig[2], orig[3]];
            let cur = [px[0], px[1], px[2], px[3]];
            let value = if premultiply(orig) == cur {
                orig
            } else {
                unpremultiply(cur)
            };
            px.copy_from_slice(&value);
        }
        out
    }

    /// Opaque straight RGBA8 composited over `bg` (straight RGBA, alpha ignored).
    pub fn flattened(&self, bg: [u8; 4]) -> WingbeatResult<Vec<u8>> {
        if !self.premultiplied {
            return Err(WingbeatError::shape(
                "flattening expects a premultiplied frame",
            ));
        }
        let mut out = vec![0u8; self.data.len()];
        flatten_over_bg(&mut out, &self.data, bg)?;
        Ok(out)
    }

    /// Straight-alpha `image::RgbaImage` (PNG output).
    pub fn to_rgba_image(&self) -> WingbeatResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_straight())
            .ok_or_else(|| WingbeatError::shape("rgba8 buffer does not match dimensions"))
    }

    /// Reinterpret as a source image, e.g. to chain another pass.
    pub fn into_source(self) -> WingbeatResult<SourceImage> {
        if !self.premultiplied {
            return Err(WingbeatError::shape(
                "source images must be premultiplied",
            ));
        }
        SourceImage::from_premul(self.width, self.height, self.data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
