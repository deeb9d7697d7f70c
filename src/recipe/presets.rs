use crate::displace::animator::Layering;
use crate::displace::kernel::Interpolation;
use crate::displace::weight::{RegionSpec, Taper, WingRegion};
use crate::effects::EffectSpec;
use crate::effects::edge_glow::{EdgeGlow, Sparkles};
use crate::effects::enhance::Enhance;
use crate::effects::flash::Flash;
use crate::effects::orbit::Orbit;
use crate::effects::sweep::{Brighten, Sweep, SweepStyle};
use crate::foundation::error::{WingbeatError, WingbeatResult};
use crate::recipe::model::{FlapSpec, Recipe};

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Built-in tuned recipes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Tapered wings blended over the body, flash and golden wave.
    SmoothWings,
    /// Lower wings lifted into their own layer, lightning wave.
    ExtractedWings,
    /// Like `ExtractedWings` with a smaller, linearly resampled motion.
    SharpWings,
    /// Narrow body with a slight sway, quintic resampling, edge glow.
    StrongWings,
    /// Static artwork with a pulsing border glow and sparkles.
    GlowPulse,
    /// Static artwork with a lightning arc circling the center.
    OrbitLightning,
    /// Strengthened artwork alpha with a gentle lightning wave, background kept transparent.
    LightningPass,
}

impl Preset {
    /// Every preset in listing order.
    pub const ALL: [Preset; 7] = [
        Preset::SmoothWings,
        Preset::ExtractedWings,
        Preset::SharpWings,
        Preset::StrongWings,
        Preset::GlowPulse,
        Preset::OrbitLightning,
        Preset::LightningPass,
    ];

    /// Kebab-case name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::SmoothWings => "smooth-wings",
            Self::ExtractedWings => "extracted-wings",
            Self::SharpWings => "sharp-wings",
            Self::StrongWings => "strong-wings",
            Self::GlowPulse => "glow-pulse",
            Self::OrbitLightning => "orbit-lightning",
            Self::LightningPass => "lightning-pass",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            Self::SmoothWings => {
                "80 frames @ 40 ms; cubic blended wing flap, end-of-cycle flash, golden wave"
            }
            Self::ExtractedWings => {
                "70 frames @ 43 ms; lower wings extracted and moved 25 px (quintic), lightning wave"
            }
            Self::SharpWings => {
                "70 frames @ 43 ms; lower wings extracted and moved 15 px (linear), lightning wave"
            }
            Self::StrongWings => "36 frames @ 55 ms; 12 px quintic flap with body sway, edge glow",
            Self::GlowPulse => "36 frames @ 55 ms; static frame, pulsing edge glow and sparkles",
            Self::OrbitLightning => "60 frames @ 50 ms; static frame, lightning arc orbiting once",
            Self::LightningPass => {
                "60 frames @ 50 ms; alpha strengthened 1.6x, gentle lightning wave, transparent"
            }
        }
    }

    /// Look a preset up by name.
    pub fn from_name(name: &str) -> WingbeatResult<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|p| p.name()).collect();
                WingbeatError::validation(format!(
                    "unknown preset '{name}' (known: {})",
                    known.join(", ")
                ))
            })
    }

    /// The recipe this preset stands for.
    pub fn recipe(self) -> Recipe {
        let soft = Some(Enhance::new(1.1, 1.15, 1.08));
        let punchy = Some(Enhance::new(1.12, 1.18, 1.10));
        let lower_wings = |amplitude_px, interpolation, taper, vertical_exponent| FlapSpec {
            amplitude_px,
            interpolation,
            layering: Layering::Extract,
            region: RegionSpec::Wings(WingRegion {
                left_end: 0.32,
                right_start: 0.68,
                taper,
                lower_start: Some(0.35),
                vertical_taper: Taper::Power {
                    exponent: vertical_exponent,
                },
                body_flex: 0.0,
            }),
            ..FlapSpec::default()
        };
        let lightning_wave = EffectSpec::Sweep(Sweep {
            band_px: 150.0,
            overshoot_px: 100.0,
            style: SweepStyle::Brighten(Brighten::default()),
            ..Sweep::default()
        });

        match self {
            Self::SmoothWings => Recipe {
                num_frames: 80,
                duration_ms: 40,
                background: Some(WHITE),
                adjust: soft,
                flap: Some(FlapSpec {
                    amplitude_px: 10.0,
                    interpolation: Interpolation::Cubic,
                    layering: Layering::Blend,
                    region: RegionSpec::Wings(WingRegion::default()),
                    ..FlapSpec::default()
                }),
                effects: vec![
                    EffectSpec::Flash(Flash::default()),
                    EffectSpec::Sweep(Sweep::default()),
                ],
                ..Recipe::default()
            },
            Self::ExtractedWings => Recipe {
                num_frames: 70,
                duration_ms: 43,
                background: Some(WHITE),
                adjust: punchy,
                flap: Some(lower_wings(
                    25.0,
                    Interpolation::Quintic,
                    Taper::Power { exponent: 1.1 },
                    1.3,
                )),
                effects: vec![lightning_wave],
                ..Recipe::default()
            },
            Self::SharpWings => Recipe {
                num_frames: 70,
                duration_ms: 43,
                background: Some(WHITE),
                adjust: punchy,
                flap: Some(lower_wings(
                    15.0,
                    Interpolation::Linear,
                    Taper::Linear,
                    1.2,
                )),
                effects: vec![lightning_wave],
                ..Recipe::default()
            },
            Self::StrongWings => Recipe {
                num_frames: 36,
                duration_ms: 55,
                background: Some(WHITE),
                adjust: soft,
                flap: Some(FlapSpec {
                    amplitude_px: 12.0,
                    interpolation: Interpolation::Quintic,
                    layering: Layering::Direct,
                    region: RegionSpec::Wings(WingRegion {
                        left_end: 0.35,
                        right_start: 0.65,
                        taper: Taper::Power { exponent: 1.2 },
                        body_flex: 0.2,
                        ..WingRegion::default()
                    }),
                    ..FlapSpec::default()
                }),
                effects: vec![EffectSpec::EdgeGlow(EdgeGlow::default())],
                ..Recipe::default()
            },
            Self::GlowPulse => Recipe {
                num_frames: 36,
                duration_ms: 55,
                background: Some(WHITE),
                adjust: soft,
                flap: None,
                effects: vec![
                    EffectSpec::EdgeGlow(EdgeGlow::default()),
                    EffectSpec::EdgeGlow(EdgeGlow::inner()),
                    EffectSpec::Sparkles(Sparkles::default()),
                ],
                ..Recipe::default()
            },
            Self::OrbitLightning => Recipe {
                num_frames: 60,
                duration_ms: 50,
                background: Some(WHITE),
                adjust: punchy,
                flap: None,
                effects: vec![EffectSpec::Orbit(Orbit::default())],
                ..Recipe::default()
            },
            Self::LightningPass => Recipe {
                num_frames: 60,
                duration_ms: 50,
                adjust: Some(Enhance::default().with_alpha_gain(1.6)),
                flap: None,
                effects: vec![EffectSpec::Sweep(Sweep {
                    // Band sigma of 80/3.5 px.
                    band_px: 80.0 * 2.5 / 3.5,
                    overshoot_px: 200.0,
                    style: SweepStyle::Brighten(Brighten {
                        brightness: 0.2,
                        contrast: 0.1,
                        threshold: 0.15,
                    }),
                    ..Sweep::default()
                })],
                ..Recipe::default()
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/recipe/presets.rs"]
mod tests;
