//! Animated container output.
//!
//! Sinks consume rendered frames in loop order. File sinks buffer the whole loop, encode it in
//! `end` and publish the file with a rename, so a failed render never leaves a truncated output.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{WingbeatError, WingbeatResult};

/// GIF output.
pub mod gif;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
/// Animated WebP output.
pub mod webp;

use gif::GifSink;
use sink::FrameSink;
use webp::WebpSink;

/// Animated container format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Animated GIF (palette, 1-bit transparency).
    Gif,
    /// Animated WebP (lossless frames, full alpha).
    Webp,
}

impl OutputFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> WingbeatResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("gif") => Ok(Self::Gif),
            Some("webp") => Ok(Self::Webp),
            _ => Err(WingbeatError::validation(format!(
                "cannot infer output format from '{}' (expected .gif or .webp)",
                path.display()
            ))),
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = WingbeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gif" => Ok(Self::Gif),
            "webp" => Ok(Self::Webp),
            other => Err(WingbeatError::validation(format!(
                "unknown output format '{other}' (expected gif or webp)"
            ))),
        }
    }
}

/// Create the file sink for `format` writing to `path`.
pub fn create_sink(path: impl Into<PathBuf>, format: OutputFormat) -> Box<dyn FrameSink> {
    match format {
        OutputFormat::Gif => Box::new(GifSink::new(path)),
        OutputFormat::Webp => Box::new(WebpSink::new(path)),
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> WingbeatResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `bytes` to `path` through a sibling temp file and a rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> WingbeatResult<()> {
    ensure_parent_dir(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".partial");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, bytes)
        .with_context(|| format!("failed to write '{}'", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("failed to move output into '{}'", path.display()))
            .into());
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

/// Encode a still image in memory and publish it with [`write_atomic`].
pub fn write_image_atomic(
    path: &Path,
    img: &image::RgbaImage,
    format: image::ImageFormat,
) -> WingbeatResult<()> {
    let mut buf = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut buf), format)
        .map_err(|e| {
            WingbeatError::encode(format!("encode {format:?} for '{}': {e}", path.display()))
        })?;
    write_atomic(path, &buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mod.rs"]
mod tests;
