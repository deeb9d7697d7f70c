use super::*;

const ALL: [Ease; 8] = [
    Ease::Linear,
    Ease::Smoothstep,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_stable() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn smoothstep_is_symmetric_at_half() {
    assert!((Ease::Smoothstep.apply(0.5) - 0.5).abs() < 1e-12);
    assert_eq!(Ease::Smoothstep.apply(-1.0), 0.0);
}
