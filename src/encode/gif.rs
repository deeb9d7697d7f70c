use std::path::PathBuf;

use image::codecs::gif::{GifEncoder, Repeat};

use crate::encode::sink::{FrameBuffer, FrameSink, SinkConfig};
use crate::encode::write_atomic;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::render::frame::FrameRGBA;

/// Palette quantization speed passed to the GIF encoder (1 = best, 30 = fastest).
pub const DEFAULT_GIF_SPEED: i32 = 10;

/// Sink producing an animated GIF file.
///
/// GIF delays have centisecond resolution; millisecond delays are truncated to it.
#[derive(Debug)]
pub struct GifSink {
    out_path: PathBuf,
    speed: i32,
    buffer: FrameBuffer,
}

impl GifSink {
    /// Create a sink writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            speed: DEFAULT_GIF_SPEED,
            buffer: FrameBuffer::default(),
        }
    }

    /// Override the quantization speed.
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> WingbeatResult<()> {
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(WingbeatError::validation(format!(
                "gif frames are limited to 65535x65535, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        self.buffer.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WingbeatResult<()> {
        self.buffer.push(idx, frame)
    }

    fn end(&mut self) -> WingbeatResult<()> {
        let (cfg, frames) = self.buffer.finish()?;
        let bytes = encode_gif(&cfg, frames, self.speed)?;
        write_atomic(&self.out_path, &bytes)?;
        tracing::info!(
            path = %self.out_path.display(),
            bytes = bytes.len(),
            "gif written"
        );
        Ok(())
    }
}

/// Encode straight-alpha RGBA frames into GIF bytes.
pub fn encode_gif(cfg: &SinkConfig, frames: Vec<Vec<u8>>, speed: i32) -> WingbeatResult<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut out, speed);
        let repeat = match cfg.loop_count {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| WingbeatError::encode(format!("gif repeat: {e}")))?;

        for (i, rgba) in frames.into_iter().enumerate() {
            let img = image::RgbaImage::from_raw(cfg.width, cfg.height, rgba)
                .ok_or_else(|| WingbeatError::encode("gif frame buffer does not match size"))?;
            let delay = image::Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1);
            encoder
                .encode_frame(image::Frame::from_parts(img, 0, 0, delay))
                .map_err(|e| WingbeatError::encode(format!("gif frame {i}: {e}")))?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
