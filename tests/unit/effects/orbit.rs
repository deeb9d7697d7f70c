use super::*;

#[test]
fn intensity_falls_off_quadratically() {
    let orbit = Orbit::default();
    assert_eq!(orbit.intensity(0.0, 0.0), 1.0);
    let half = orbit.intensity(0.0, 50f32.to_radians());
    assert!((half - 0.25).abs() < 1e-4);
    assert_eq!(orbit.intensity(0.0, 120f32.to_radians()), 0.0);
}

#[test]
fn intensity_wraps_around_pi() {
    let orbit = Orbit::default();
    let a = orbit.intensity(TAU - 0.1, 0.1);
    let b = orbit.intensity(0.0, 0.2);
    assert!((a - b).abs() < 1e-4);
}

#[test]
fn arc_head_follows_the_loop() {
    let orbit = Orbit {
        arc_deg: 30.0,
        ..Orbit::default()
    };
    let phase = LoopPhase::new(4).unwrap();
    let size = 21u32;
    let mut right = FrameRGBA::from_premul(size, size, [100, 100, 100, 255].repeat(441)).unwrap();
    orbit.apply(&mut right, phase, FrameIndex(0));
    // Frame 0 points along +x; frame 1 along +y (image rows grow downward).
    assert!(right.pixel(20, 10)[0] > 100);
    assert_eq!(right.pixel(0, 10), [100, 100, 100, 255]);

    let mut down = FrameRGBA::from_premul(size, size, [100, 100, 100, 255].repeat(441)).unwrap();
    orbit.apply(&mut down, phase, FrameIndex(1));
    assert!(down.pixel(10, 20)[0] > 100);
    assert_eq!(down.pixel(20, 10), [100, 100, 100, 255]);
}

#[test]
fn validate_bounds_arc() {
    assert!(Orbit::default().validate().is_ok());
    let bad = Orbit {
        arc_deg: 0.0,
        ..Orbit::default()
    };
    assert!(bad.validate().is_err());
}
