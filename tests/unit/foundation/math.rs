use super::*;

#[test]
fn mul_div255_endpoints() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(200, 255), 200);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 128), 64);
}

#[test]
fn to_u8_rounds_and_clamps() {
    assert_eq!(to_u8(-3.0), 0);
    assert_eq!(to_u8(254.6), 255);
    assert_eq!(to_u8(300.0), 255);
    assert_eq!(to_u8(f32::NAN), 0);
}

#[test]
fn smoothstep_is_clamped_and_symmetric() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn fraction_px_floors() {
    assert_eq!(fraction_px(0.3, 100), 30.0);
    assert_eq!(fraction_px(0.32, 99), 31.0);
    assert_eq!(fraction_px(0.7, 100), 70.0);
    assert_eq!(fraction_px(0.35, 100), 35.0);
}
