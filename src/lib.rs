//! Wingbeat turns a single static illustration into a seamless looping animation.
//!
//! The core is a sinusoidal displacement animator: each pixel is shifted along one axis by
//! `sin(2π·t/N) · amplitude · w(x, y)`, where the region weight `w` keeps a body still while
//! the wings flap. Frame `N` equals frame `0`, so the output loops without a seam.
//!
//! On top of that sit per-frame effects (lightning flash, sweep band, orbiting arc, edge glow,
//! sparkles), one-off source adjustments (background cutout, brightness/saturation/contrast),
//! GIF and animated WebP sinks, JSON recipes with built-in presets, and the `wingbeat` CLI.
//!
//! - Load a [`SourceImage`] with [`load_image`]
//! - Describe the animation with a [`Recipe`] (or a [`Preset`])
//! - [`Animation::prepare`] it, then [`render_to_sink`] or [`render_to_file`]
//!
//! For one-shot use, [`displace_frame`] renders a single flap frame from an image.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;

/// Loop phase and easing.
pub mod animation;
/// Displacement animator.
pub mod displace;
pub mod effects;
pub mod encode;
pub mod recipe;
pub mod render;

pub use crate::foundation::color::PremulRgba8;
pub use crate::foundation::core::{Canvas, FrameIndex};
pub use crate::foundation::error::{WingbeatError, WingbeatResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::phase::LoopPhase;
pub use crate::assets::decode::{AlphaPolicy, SourceImage, decode_image, load_image};
pub use crate::displace::animator::{DisplacementAnimator, FlapParams, Layering, displace_frame};
pub use crate::displace::field::{Axis, DisplacementField};
pub use crate::displace::kernel::{Boundary, Interpolation};
pub use crate::displace::weight::{RegionSpec, RegionWeight, Taper, WeightMap, WingRegion};
pub use crate::effects::background::Cutout;
pub use crate::effects::enhance::Enhance;
pub use crate::effects::{EffectSpec, FrameEffect};
pub use crate::encode::gif::GifSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::webp::WebpSink;
pub use crate::encode::{OutputFormat, create_sink};
pub use crate::recipe::load_recipe;
pub use crate::recipe::model::{FlapSpec, Recipe};
pub use crate::recipe::presets::Preset;
pub use crate::render::frame::FrameRGBA;
pub use crate::render::pipeline::{
    Animation, RenderStats, RenderThreading, render_frames, render_to_file, render_to_sink,
};
