use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::animation::phase::LoopPhase;
use crate::assets::decode::{AlphaPolicy, SourceImage, load_image};
use crate::displace::animator::DisplacementAnimator;
use crate::effects::{EffectSpec, FrameEffect};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::encode::{OutputFormat, create_sink};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::recipe::model::Recipe;
use crate::render::frame::FrameRGBA;

/// A recipe bound to a prepared source, ready to render frames.
///
/// Preparation applies the one-off source passes (cut-out, color adjustment) and caches the
/// flap's weight map, so every frame only pays for displacement and effects.
#[derive(Debug)]
pub struct Animation {
    phase: LoopPhase,
    source: SourceImage,
    animator: Option<DisplacementAnimator>,
    effects: Vec<EffectSpec>,
    sink: SinkConfig,
}

impl Animation {
    /// Validate `recipe` and prepare `source` for it.
    #[tracing::instrument(skip_all, fields(width = source.width, height = source.height))]
    pub fn prepare(source: &SourceImage, recipe: &Recipe) -> WingbeatResult<Self> {
        recipe.validate()?;
        let phase = LoopPhase::new(recipe.num_frames)?;

        let mut prepared = match &recipe.cutout {
            Some(cutout) => cutout.apply(source)?,
            None => source.clone(),
        };
        if let Some(adjust) = &recipe.adjust
            && !adjust.is_identity()
        {
            let mut data = prepared.rgba8_straight.as_ref().clone();
            adjust.apply_straight(&mut data);
            prepared = SourceImage::from_straight(prepared.width, prepared.height, data)?;
        }

        let animator = recipe
            .flap
            .as_ref()
            .map(|flap| {
                DisplacementAnimator::new(&prepared, recipe.num_frames, flap.params(), &flap.region)
            })
            .transpose()?;

        Ok(Self {
            phase,
            sink: SinkConfig {
                width: prepared.width,
                height: prepared.height,
                frame_delay_ms: recipe.duration_ms,
                loop_count: recipe.loop_count,
                background: recipe.background,
            },
            source: prepared,
            animator,
            effects: recipe.effects.clone(),
        })
    }

    /// Loop phase.
    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Source after the one-off passes.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// Sink configuration derived from the recipe.
    pub fn sink_config(&self) -> &SinkConfig {
        &self.sink
    }

    /// Render one frame: flap first, then the effects in recipe order.
    pub fn render_frame(&self, idx: FrameIndex) -> WingbeatResult<FrameRGBA> {
        self.phase.check(idx)?;
        let start = Instant::now();
        let mut frame = match &self.animator {
            Some(animator) => animator.render(idx)?,
            None => FrameRGBA::from_source(&self.source),
        };
        for effect in &self.effects {
            effect.apply(&mut frame, self.phase, idx)?;
        }
        tracing::debug!(
            frame = idx.0,
            elapsed_us = start.elapsed().as_micros() as u64,
            "rendered frame"
        );
        Ok(frame)
    }
}

/// Threading controls for multi-frame rendering.
#[derive(Clone, Debug, Default)]
pub struct RenderThreading {
    /// Render frames on a worker pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Summary of a finished render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames rendered.
    pub frames: u32,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Size of the written file, `0` for in-memory sinks.
    pub bytes_written: u64,
}

/// Render every frame of the loop in order.
pub fn render_frames(
    anim: &Animation,
    threading: &RenderThreading,
) -> WingbeatResult<Vec<FrameRGBA>> {
    let n = anim.phase.total_frames();
    if !threading.parallel {
        return anim.phase.frames().map(|i| anim.render_frame(i)).collect();
    }
    let pool = build_thread_pool(threading.threads)?;
    pool.install(|| {
        (0..n)
            .into_par_iter()
            .map(|i| anim.render_frame(FrameIndex(i)))
            .collect()
    })
}

/// Render the loop and stream it into `sink`.
///
/// All frames are rendered before `begin`, so a failing frame never reaches the sink.
pub fn render_to_sink(
    anim: &Animation,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
) -> WingbeatResult<RenderStats> {
    let frames = render_frames(anim, threading)?;
    sink.begin(anim.sink.clone())?;
    for (i, frame) in frames.iter().enumerate() {
        sink.push_frame(FrameIndex(i as u32), frame)?;
    }
    sink.end()?;
    Ok(RenderStats {
        frames: frames.len() as u32,
        width: anim.sink.width,
        height: anim.sink.height,
        bytes_written: 0,
    })
}

/// Load `in_path`, render `recipe` and write the animation to `out_path`.
#[tracing::instrument(
    skip_all,
    fields(in_path = %in_path.display(), out_path = %out_path.display())
)]
pub fn render_to_file(
    in_path: &Path,
    out_path: &Path,
    recipe: &Recipe,
    threading: &RenderThreading,
) -> WingbeatResult<RenderStats> {
    recipe.validate()?;
    let format = match recipe.format {
        Some(f) => f,
        None => OutputFormat::from_path(out_path)?,
    };
    let policy = if recipe.require_alpha {
        AlphaPolicy::Require
    } else {
        AlphaPolicy::Promote
    };
    let source = load_image(in_path, policy)?;
    let anim = Animation::prepare(&source, recipe)?;

    let start = Instant::now();
    let mut sink = create_sink(out_path, format);
    let mut stats = render_to_sink(&anim, sink.as_mut(), threading)?;
    stats.bytes_written = std::fs::metadata(out_path)
        .map(|m| m.len())
        .map_err(|e| WingbeatError::encode(format!("output missing after write: {e}")))?;

    tracing::info!(
        frames = stats.frames,
        width = stats.width,
        height = stats.height,
        bytes = stats.bytes_written,
        format = format.extension(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "render finished"
    );
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> WingbeatResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(WingbeatError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| WingbeatError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
