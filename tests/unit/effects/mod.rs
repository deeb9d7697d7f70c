use super::*;

#[test]
fn effect_specs_deserialize_by_kind() {
    let effects: Vec<EffectSpec> = serde_json::from_str(
        r#"[
            {"kind": "flash"},
            {"kind": "orbit", "arc_deg": 90},
            {"kind": "edge_glow", "width_px": 30},
            {"kind": "sparkles"},
            {"kind": "sweep", "style": {"kind": "tint", "blur": [4]}}
        ]"#,
    )
    .unwrap();
    let names: Vec<_> = effects.iter().map(EffectSpec::name).collect();
    assert_eq!(names, ["flash", "orbit", "edge_glow", "sparkles", "sweep"]);
    assert!(effects.iter().all(|e| e.validate().is_ok()));
}

#[test]
fn unknown_kind_is_rejected() {
    assert!(serde_json::from_str::<EffectSpec>(r#"{"kind": "confetti"}"#).is_err());
}

#[test]
fn dispatch_runs_the_effect() {
    let phase = LoopPhase::new(4).unwrap();
    let spec = EffectSpec::Orbit(Orbit {
        arc_deg: 180.0,
        threshold: 0.0,
        ..Orbit::default()
    });
    let mut frame = FrameRGBA::from_premul(4, 4, [100, 100, 100, 255].repeat(16)).unwrap();
    spec.apply(&mut frame, phase, FrameIndex(0)).unwrap();
    assert!(frame.data.chunks_exact(4).any(|px| px[0] > 100));
}

#[test]
fn invalid_effect_fails_validation() {
    let spec = EffectSpec::Flash(Flash {
        start: 0.5,
        end: 0.5,
        ..Flash::default()
    });
    assert!(spec.validate().unwrap_err().is_precondition());
}
