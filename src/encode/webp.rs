use std::path::PathBuf;

use image::codecs::webp::WebPEncoder;

use crate::encode::sink::{FrameBuffer, FrameSink, SinkConfig};
use crate::encode::write_atomic;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::render::frame::FrameRGBA;

/// Largest canvas side the lossless bitstream can describe.
pub const MAX_WEBP_DIMENSION: u32 = 16_384;

/// Largest per-frame duration the container can store.
const MAX_DURATION_MS: u32 = (1 << 24) - 1;

const VP8X_FLAG_ALPHA: u8 = 0x10;
const VP8X_FLAG_ANIMATION: u8 = 0x02;
const ANMF_NO_BLEND: u8 = 0x02;

/// Sink producing an animated WebP file.
///
/// Every frame is encoded losslessly and placed as a full-canvas `ANMF` chunk that replaces the
/// previous frame (no blending, no disposal).
#[derive(Debug)]
pub struct WebpSink {
    out_path: PathBuf,
    buffer: FrameBuffer,
}

impl WebpSink {
    /// Create a sink writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            buffer: FrameBuffer::default(),
        }
    }
}

impl FrameSink for WebpSink {
    fn begin(&mut self, cfg: SinkConfig) -> WingbeatResult<()> {
        if cfg.width > MAX_WEBP_DIMENSION || cfg.height > MAX_WEBP_DIMENSION {
            return Err(WingbeatError::validation(format!(
                "webp frames are limited to {MAX_WEBP_DIMENSION}x{MAX_WEBP_DIMENSION}, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        if cfg.frame_delay_ms > MAX_DURATION_MS {
            return Err(WingbeatError::validation(format!(
                "webp frame duration must be <= {MAX_DURATION_MS} ms"
            )));
        }
        self.buffer.begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> WingbeatResult<()> {
        self.buffer.push(idx, frame)
    }

    fn end(&mut self) -> WingbeatResult<()> {
        let (cfg, frames) = self.buffer.finish()?;
        let bytes = encode_animated_webp(&cfg, &frames)?;
        write_atomic(&self.out_path, &bytes)?;
        tracing::info!(
            path = %self.out_path.display(),
            bytes = bytes.len(),
            "webp written"
        );
        Ok(())
    }
}

/// Encode straight-alpha RGBA frames into an animated WebP.
pub fn encode_animated_webp(cfg: &SinkConfig, frames: &[Vec<u8>]) -> WingbeatResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(WingbeatError::encode("animated webp needs at least one frame"));
    }

    let mut body = Vec::new();
    body.extend_from_slice(b"WEBP");

    let mut vp8x = [0u8; 10];
    vp8x[0] = VP8X_FLAG_ANIMATION
        | if cfg.background.is_none() {
            VP8X_FLAG_ALPHA
        } else {
            0
        };
    put_u24(&mut vp8x[4..7], cfg.width - 1);
    put_u24(&mut vp8x[7..10], cfg.height - 1);
    push_chunk(&mut body, b"VP8X", &vp8x);

    let mut anim = [0u8; 6];
    // Canvas background in B, G, R, A order.
    let [r, g, b, a] = cfg.background.unwrap_or([0, 0, 0, 0]);
    anim[..4].copy_from_slice(&[b, g, r, a]);
    anim[4..6].copy_from_slice(&cfg.loop_count.to_le_bytes());
    push_chunk(&mut body, b"ANIM", &anim);

    for (i, rgba) in frames.iter().enumerate() {
        let still = encode_still(cfg.width, cfg.height, rgba)
            .map_err(|e| WingbeatError::encode(format!("webp frame {i}: {e}")))?;
        let mut anmf = Vec::with_capacity(16 + still.len());
        anmf.extend_from_slice(&[0u8; 6]);
        let mut dims = [0u8; 9];
        put_u24(&mut dims[0..3], cfg.width - 1);
        put_u24(&mut dims[3..6], cfg.height - 1);
        put_u24(&mut dims[6..9], cfg.frame_delay_ms.min(MAX_DURATION_MS));
        anmf.extend_from_slice(&dims);
        anmf.push(ANMF_NO_BLEND);
        for (fourcc, payload) in riff_chunks(&still)? {
            if matches!(&fourcc, b"ALPH" | b"VP8 " | b"VP8L") {
                push_chunk(&mut anmf, &fourcc, payload);
            }
        }
        push_chunk(&mut body, b"ANMF", &anmf);
    }

    let riff_len = u32::try_from(body.len())
        .map_err(|_| WingbeatError::encode("animated webp exceeds 4 GiB"))?;
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&riff_len.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

fn encode_still(width: u32, height: u32, rgba: &[u8]) -> WingbeatResult<Vec<u8>> {
    let mut out = Vec::new();
    WebPEncoder::new_lossless(&mut out)
        .encode(rgba, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| WingbeatError::encode(e.to_string()))?;
    Ok(out)
}

/// Split a RIFF/WEBP file into its top-level chunks.
pub(crate) fn riff_chunks(bytes: &[u8]) -> WingbeatResult<Vec<([u8; 4], &[u8])>> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WEBP" {
        return Err(WingbeatError::encode("not a RIFF/WEBP stream"));
    }
    let mut chunks = Vec::new();
    let mut pos = 12usize;
    while pos + 8 <= bytes.len() {
        let fourcc = [bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]];
        let len = u32::from_le_bytes([
            bytes[pos + 4],
            bytes[pos + 5],
            bytes[pos + 6],
            bytes[pos + 7],
        ]) as usize;
        let start = pos + 8;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| WingbeatError::encode("truncated RIFF chunk"))?;
        chunks.push((fourcc, &bytes[start..end]));
        pos = end + (len & 1);
    }
    Ok(chunks)
}

fn push_chunk(out: &mut Vec<u8>, fourcc: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(fourcc);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
}

fn put_u24(dst: &mut [u8], v: u32) {
    dst.copy_from_slice(&v.to_le_bytes()[..3]);
}

#[cfg(test)]
#[path = "../../tests/unit/encode/webp.rs"]
mod tests;
