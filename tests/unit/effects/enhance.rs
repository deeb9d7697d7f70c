use super::*;

#[test]
fn identity_leaves_buffer_untouched() {
    let mut data = vec![10, 20, 30, 40, 200, 100, 50, 255];
    let before = data.clone();
    Enhance::default().apply_premul(&mut data);
    assert_eq!(data, before);
}

#[test]
fn brightness_scales_and_saturates() {
    let mut data = vec![100, 200, 50, 255];
    Enhance::new(1.5, 1.0, 1.0).apply_straight(&mut data);
    assert_eq!(data, vec![150, 255, 75, 255]);
}

#[test]
fn zero_saturation_gives_gray() {
    let mut data = vec![255, 0, 0, 255];
    Enhance::new(1.0, 0.0, 1.0).apply_straight(&mut data);
    // Rec.601 luma of pure red.
    assert_eq!(data, vec![76, 76, 76, 255]);
}

#[test]
fn contrast_pivots_on_visible_mean() {
    // Mean luma of the visible pixels is 100; the transparent pixel does not count.
    let mut data = vec![50, 50, 50, 255, 150, 150, 150, 255, 255, 255, 255, 0];
    Enhance::new(1.0, 1.0, 2.0).apply_straight(&mut data);
    assert_eq!(&data[..8], &[0, 0, 0, 255, 200, 200, 200, 255]);
    assert_eq!(data[11], 0);
}

#[test]
fn alpha_is_preserved() {
    let mut data = vec![64, 32, 16, 128];
    Enhance::new(1.2, 1.1, 1.05).apply_premul(&mut data);
    assert_eq!(data[3], 128);
    assert!(data[0] <= 128 && data[1] <= 128 && data[2] <= 128);
}

#[test]
fn validate_rejects_negative_and_nan() {
    assert!(Enhance::new(1.1, 1.15, 1.08).validate().is_ok());
    assert!(Enhance::new(-0.1, 1.0, 1.0).validate().is_err());
    assert!(Enhance::new(1.0, f32::NAN, 1.0).validate().is_err());
}

#[test]
fn boost_pixel_brightens_then_stretches() {
    // 100·1.5 = 150; 128 + (150 − 128)·2 = 172.
    assert_eq!(boost_pixel([100, 100, 100], 1.5, 2.0), [172, 172, 172]);
    assert_eq!(boost_pixel([250, 0, 128], 1.2, 1.0), [255, 0, 154]);
}

#[test]
fn boost_premul_skips_transparent() {
    let mut px = [0u8, 0, 0, 0];
    boost_premul(&mut px, 2.0, 2.0);
    assert_eq!(px, [0, 0, 0, 0]);
}

#[test]
fn alpha_gain_strengthens_only_visible_pixels() {
    let mut data = vec![50, 50, 50, 100, 50, 50, 50, 10, 50, 50, 50, 200];
    Enhance::default().with_alpha_gain(1.6).apply_straight(&mut data);
    assert_eq!(data, vec![50, 50, 50, 160, 50, 50, 50, 10, 50, 50, 50, 255]);
}

#[test]
fn alpha_gain_is_part_of_identity_and_validation() {
    assert!(!Enhance::default().with_alpha_gain(1.5).is_identity());
    assert!(Enhance::default().with_alpha_gain(-1.0).validate().is_err());
    let parsed: Enhance = serde_json::from_str(r#"{"alpha_gain": 1.6}"#).unwrap();
    assert_eq!(parsed, Enhance::default().with_alpha_gain(1.6));
}
