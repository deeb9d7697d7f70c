use super::*;

#[test]
fn sigma_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_premul(&src, 1, 2, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    let out = blur_premul(&src, w, h, 1.5).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_premul(&src, w, h, 1.0).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 16);
}

#[test]
fn negative_sigma_is_rejected() {
    assert!(blur_premul(&[0u8; 4], 1, 1, -1.0).is_err());
    assert!(blur_premul(&[0u8; 3], 1, 1, 1.0).is_err());
}

#[test]
fn oversized_sigma_is_rejected() {
    let src = vec![0u8; 16];
    assert!(blur_premul(&src, 2, 2, MAX_BLUR_SIGMA).is_ok());
    let err = blur_premul(&src, 2, 2, 1.0e6).unwrap_err();
    assert!(matches!(err, WingbeatError::Validation(_)));
    assert!(blur_premul(&src, 2, 2, f32::INFINITY).is_err());
}
