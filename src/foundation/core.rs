use crate::foundation::error::{WingbeatError, WingbeatResult};

/// 0-based frame index inside an animation loop.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

/// Raster dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas, rejecting zero-size dimensions.
    pub fn new(width: u32, height: u32) -> WingbeatResult<Self> {
        if width == 0 || height == 0 {
            return Err(WingbeatError::shape(format!(
                "image must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> WingbeatResult<usize> {
        self.pixel_count()
            .checked_mul(4)
            .ok_or_else(|| WingbeatError::shape("rgba8 buffer size overflow"))
    }

    /// Check that `data` is a tightly packed RGBA8 buffer of this size.
    pub fn check_rgba8(self, data: &[u8]) -> WingbeatResult<()> {
        let expected = self.rgba8_len()?;
        if data.len() != expected {
            return Err(WingbeatError::shape(format!(
                "rgba8 buffer has {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
