use super::*;
use crate::displace::weight::RegionSpec;

fn row_gradient(width: u32, height: u32) -> SourceImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for _ in 0..width {
            let v = (y * 2) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    SourceImage::from_premul(width, height, data).unwrap()
}

fn params(amplitude_px: f64, interpolation: Interpolation, layering: Layering) -> FlapParams {
    FlapParams {
        amplitude_px,
        axis: Axis::Vertical,
        interpolation,
        layering,
    }
}

fn uniform(_x: u32, _y: u32, _w: u32, _h: u32) -> f32 {
    1.0
}

fn right_half(x: u32, _y: u32, _w: u32, _h: u32) -> f32 {
    if x < 50 { 0.0 } else { 1.0 }
}

#[test]
fn zero_amplitude_is_identity_for_every_kernel_and_layering() {
    let src = row_gradient(16, 12);
    for interp in [
        Interpolation::Nearest,
        Interpolation::Linear,
        Interpolation::Cubic,
        Interpolation::Quintic,
    ] {
        for layering in [Layering::Direct, Layering::Blend, Layering::Extract] {
            let p = params(0.0, interp, layering);
            for i in 0..5 {
                let frame = displace_frame(&src, FrameIndex(i), 5, &p, &uniform).unwrap();
                assert_eq!(frame.data, *src.rgba8_premul, "{interp:?} {layering:?} frame {i}");
            }
        }
    }
}

#[test]
fn output_keeps_source_dimensions() {
    let src = row_gradient(7, 3);
    let p = params(4.0, Interpolation::Cubic, Layering::Direct);
    let frame = displace_frame(&src, FrameIndex(1), 6, &p, &RegionSpec::default()).unwrap();
    assert_eq!((frame.width, frame.height), (7, 3));
    assert_eq!(frame.data.len(), 7 * 3 * 4);
}

#[test]
fn loop_wraps_without_a_jump() {
    let src = row_gradient(4, 4);
    let anim = DisplacementAnimator::new(
        &src,
        12,
        params(10.0, Interpolation::Linear, Layering::Direct),
        &uniform,
    )
    .unwrap();
    let phase = anim.phase();
    assert!((phase.sine_at(0.0) - phase.sine_at(12.0)).abs() < 1e-9);
    assert_eq!(anim.displacement(FrameIndex(0)).unwrap(), 0.0);
    assert_eq!(anim.render(FrameIndex(0)).unwrap().data, *src.rgba8_premul);

    // Neighbours across the wrap move by the same step.
    let last = anim.displacement(FrameIndex(11)).unwrap();
    let first = anim.displacement(FrameIndex(1)).unwrap();
    assert!((first + last).abs() < 1e-9);
}

#[test]
fn uniform_scenario_offsets_follow_the_sine() {
    let src = row_gradient(100, 100);
    let anim = DisplacementAnimator::new(
        &src,
        4,
        params(10.0, Interpolation::Linear, Layering::Direct),
        &uniform,
    )
    .unwrap();

    let expected = [0.0, 10.0, 0.0, -10.0];
    for (i, want) in expected.iter().enumerate() {
        let d = anim.displacement(FrameIndex(i as u32)).unwrap();
        assert!((d - want).abs() < 1e-9, "frame {i}: {d}");
    }

    let f0 = anim.render(FrameIndex(0)).unwrap();
    let f1 = anim.render(FrameIndex(1)).unwrap();
    let f2 = anim.render(FrameIndex(2)).unwrap();
    let f3 = anim.render(FrameIndex(3)).unwrap();
    assert_eq!(f0.data, *src.rgba8_premul);
    assert_eq!(f2.data, *src.rgba8_premul);
    for y in 0..100u32 {
        let up = (y + 10).min(99);
        let down = y.saturating_sub(10);
        assert_eq!(f1.pixel(37, y), src.pixel(37, up), "frame 1 row {y}");
        assert_eq!(f3.pixel(37, y), src.pixel(37, down), "frame 3 row {y}");
    }
}

#[test]
fn static_half_is_untouched_and_moving_half_shifts() {
    let src = row_gradient(100, 100);
    let anim = DisplacementAnimator::new(
        &src,
        4,
        params(10.0, Interpolation::Linear, Layering::Direct),
        &right_half,
    )
    .unwrap();

    for i in 0..4u32 {
        let frame = anim.render(FrameIndex(i)).unwrap();
        let d = anim.displacement(FrameIndex(i)).unwrap().round() as i64;
        for y in 0..100u32 {
            for x in [0u32, 25, 49] {
                assert_eq!(frame.pixel(x, y), src.pixel(x, y));
            }
            let sy = (i64::from(y) + d).clamp(0, 99) as u32;
            for x in [50u32, 75, 99] {
                assert_eq!(frame.pixel(x, y), src.pixel(x, sy), "frame {i} ({x},{y})");
            }
        }
    }
}

#[test]
fn static_zone_of_wing_region_never_moves() {
    let src = row_gradient(40, 20);
    let region = RegionSpec::default();
    let anim = DisplacementAnimator::new(
        &src,
        8,
        params(6.0, Interpolation::Quintic, Layering::Direct),
        &region,
    )
    .unwrap();
    for i in 0..8u32 {
        let field = anim.field(FrameIndex(i)).unwrap();
        let frame = anim.render(FrameIndex(i)).unwrap();
        // 0.30·40 = 12 and 0.70·40 = 28 bound the body.
        for x in 12..=28u32 {
            for y in 0..20u32 {
                assert_eq!(field.offset(x, y), 0.0);
                assert_eq!(frame.pixel(x, y), src.pixel(x, y));
            }
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    let src = row_gradient(30, 30);
    let p = params(7.5, Interpolation::Cubic, Layering::Blend);
    let a = displace_frame(&src, FrameIndex(3), 10, &p, &RegionSpec::default()).unwrap();
    let b = displace_frame(&src, FrameIndex(3), 10, &p, &RegionSpec::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn blend_mixes_by_weight() {
    let src = row_gradient(4, 20);
    let half = |_x: u32, _y: u32, _w: u32, _h: u32| 0.5f32;
    let p = params(10.0, Interpolation::Linear, Layering::Blend);
    let frame = displace_frame(&src, FrameIndex(1), 4, &p, &half).unwrap();
    // Weight 0.5 moves by 5 px and then mixes half of that in: 0 and 10 → 5.
    assert_eq!(frame.pixel(0, 0), [5, 5, 5, 255]);
}

#[test]
fn extract_leaves_transparent_gap_past_the_edge() {
    let src = row_gradient(100, 100);
    let p = params(10.0, Interpolation::Linear, Layering::Extract);
    let frame = displace_frame(&src, FrameIndex(1), 4, &p, &right_half).unwrap();
    assert_eq!(frame.pixel(20, 95), src.pixel(20, 95));
    assert_eq!(frame.pixel(60, 95), [0, 0, 0, 0]);
    assert_eq!(frame.pixel(60, 10), src.pixel(60, 20));
}

#[test]
fn horizontal_axis_moves_columns() {
    let mut data = Vec::new();
    for _y in 0..2u32 {
        for x in 0..8u32 {
            let v = (x * 30) as u8;
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let src = SourceImage::from_premul(8, 2, data).unwrap();
    let p = FlapParams {
        amplitude_px: 2.0,
        axis: Axis::Horizontal,
        ..FlapParams::default()
    };
    let frame = displace_frame(&src, FrameIndex(1), 4, &p, &uniform).unwrap();
    assert_eq!(frame.pixel(0, 1), [60, 60, 60, 255]);
    assert_eq!(frame.pixel(7, 0), [210, 210, 210, 255]);
}

#[test]
fn invalid_parameters_are_rejected_before_rendering() {
    let src = row_gradient(4, 4);
    let ok = FlapParams::default();

    let err = displace_frame(&src, FrameIndex(0), 1, &ok, &uniform).unwrap_err();
    assert!(matches!(err, WingbeatError::Validation(_)));

    let err = displace_frame(&src, FrameIndex(4), 4, &ok, &uniform).unwrap_err();
    assert!(matches!(err, WingbeatError::Validation(_)));

    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let p = FlapParams {
            amplitude_px: bad,
            ..ok
        };
        let err = displace_frame(&src, FrameIndex(0), 4, &p, &uniform).unwrap_err();
        assert!(err.is_precondition());
    }

    let nan_region = |_x: u32, _y: u32, _w: u32, _h: u32| f32::NAN;
    assert!(DisplacementAnimator::new(&src, 4, ok, &nan_region).is_err());
}

#[test]
fn flap_params_deserialize_with_defaults() {
    let p: FlapParams =
        serde_json::from_str(r#"{"amplitude_px": 25, "interpolation": "quintic"}"#).unwrap();
    assert_eq!(p.amplitude_px, 25.0);
    assert_eq!(p.interpolation, Interpolation::Quintic);
    assert_eq!(p.layering, Layering::Direct);
    assert!(serde_json::from_str::<FlapParams>(r#"{"amp": 1}"#).is_err());
}

fn translucent_rows(width: u32, height: u32) -> image::RgbaImage {
    image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([200, (y * 9) as u8, (x * 7) as u8, (1 + (x + y) % 6) as u8])
    })
}

#[test]
fn zero_amplitude_output_matches_a_translucent_input() {
    let img = translucent_rows(12, 10);
    let src = SourceImage::from_rgba_image(img.clone()).unwrap();
    for layering in [Layering::Direct, Layering::Blend, Layering::Extract] {
        let p = params(0.0, Interpolation::Cubic, layering);
        for i in 0..4 {
            let frame = displace_frame(&src, FrameIndex(i), 4, &p, &uniform).unwrap();
            assert_eq!(frame.to_rgba_image().unwrap(), img, "{layering:?} frame {i}");
        }
    }
}

#[test]
fn static_columns_of_a_translucent_input_are_written_unchanged() {
    let img = translucent_rows(100, 20);
    let src = SourceImage::from_rgba_image(img.clone()).unwrap();
    let p = params(4.0, Interpolation::Linear, Layering::Direct);
    let frame = displace_frame(&src, FrameIndex(1), 4, &p, &right_half).unwrap();
    let out = frame.to_rgba_image().unwrap();
    for y in 0..20 {
        for x in 0..50 {
            assert_eq!(out.get_pixel(x, y), img.get_pixel(x, y), "({x},{y})");
        }
    }
}
