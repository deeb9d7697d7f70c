use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Display duration of every frame in milliseconds.
    pub frame_delay_ms: u32,
    /// Loop count, `0` = infinite.
    pub loop_count: u16,
    /// When set, frames are flattened onto this straight RGBA color before encoding.
    pub background: Option<[u8; 4]>,
}

impl SinkConfig {
    pub(crate) fn validate(&self) -> WingbeatResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WingbeatError::validation(
                "sink width/height must be non-zero",
            ));
        }
        if self.frame_delay_ms == 0 {
            return Err(WingbeatError::validation("frame_delay_ms must be >= 1"));
        }
        Ok(())
    }
}

/// Sink contract for consuming rendered frames in loop order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> WingbeatResult<()>;
    /// Push one frame in strictly increasing loop order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WingbeatResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> WingbeatResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in loop order.
    pub(crate) frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> WingbeatResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WingbeatResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> WingbeatResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Straight-alpha frames collected by the file sinks until `end`.
#[derive(Debug, Default)]
pub(crate) struct FrameBuffer {
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames: Vec<Vec<u8>>,
}

impl FrameBuffer {
    pub(crate) fn begin(&mut self, cfg: SinkConfig) -> WingbeatResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames.clear();
        Ok(())
    }

    pub(crate) fn push(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WingbeatResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| WingbeatError::encode("sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(WingbeatError::encode(format!(
                "out-of-order frame index {} after {}",
                idx.0, last.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(WingbeatError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        frame.canvas().check_rgba8(&frame.data)?;

        let rgba = match cfg.background {
            Some(bg) => frame.flattened(bg)?,
            None => frame.to_straight(),
        };
        self.frames.push(rgba);
        self.last_idx = Some(idx);
        Ok(())
    }

    /// Hand out the collected frames and reset.
    pub(crate) fn finish(&mut self) -> WingbeatResult<(SinkConfig, Vec<Vec<u8>>)> {
        let cfg = self
            .cfg
            .take()
            .ok_or_else(|| WingbeatError::encode("sink not started"))?;
        if self.frames.is_empty() {
            return Err(WingbeatError::encode("no frames were pushed"));
        }
        self.last_idx = None;
        Ok((cfg, std::mem::take(&mut self.frames)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
