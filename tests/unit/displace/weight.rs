use super::*;

#[test]
fn tapers_hit_endpoints() {
    for taper in [Taper::Linear, Taper::Power { exponent: 1.3 }, Taper::Smooth] {
        assert_eq!(taper.apply(0.0), 0.0);
        assert_eq!(taper.apply(1.0), 1.0);
        assert!(taper.apply(0.5) > 0.0 && taper.apply(0.5) < 1.0);
    }
    assert_eq!(Taper::Linear.apply(2.0), 1.0);
}

#[test]
fn closures_are_region_weights() {
    let right_half = |x: u32, _y: u32, w: u32, _h: u32| if x >= w / 2 { 1.0f32 } else { 0.0 };
    let map = WeightMap::sample(4, 2, &right_half).unwrap();
    assert_eq!(map.as_slice(), &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn wings_are_static_in_the_body_and_full_at_edges() {
    let spec = RegionSpec::Wings(WingRegion::default());
    let (w, h) = (100, 10);
    assert_eq!(spec.weight(0, 5, w, h), 1.0);
    for x in 30..=70 {
        assert_eq!(spec.weight(x, 5, w, h), 0.0, "x={x}");
    }
    assert!((spec.weight(15, 5, w, h) - 0.5).abs() < 1e-6);
    assert!((spec.weight(85, 5, w, h) - 0.5).abs() < 1e-6);
    assert!(spec.weight(99, 5, w, h) > 0.95);
}

#[test]
fn lower_start_keeps_upper_rows_static() {
    let spec = RegionSpec::Wings(WingRegion {
        lower_start: Some(0.5),
        vertical_taper: Taper::Power { exponent: 1.3 },
        ..WingRegion::default()
    });
    for y in 0..=50 {
        assert_eq!(spec.weight(0, y, 100, 100), 0.0, "y={y}");
    }
    assert!(spec.weight(0, 99, 100, 100) > 0.9);
    assert!(spec.weight(0, 75, 100, 100) < spec.weight(0, 90, 100, 100));
}

#[test]
fn body_flex_peaks_in_the_center() {
    let spec = RegionSpec::Wings(WingRegion {
        left_end: 0.35,
        right_start: 0.65,
        body_flex: 0.2,
        ..WingRegion::default()
    });
    assert!((spec.weight(50, 0, 100, 100) - 0.2).abs() < 1e-6);
    assert_eq!(spec.weight(35, 0, 100, 100), 0.0);
}

#[test]
fn columns_split_at_fraction() {
    let spec = RegionSpec::Columns { from: 0.5, to: 1.0 };
    assert_eq!(spec.weight(49, 0, 100, 100), 0.0);
    assert_eq!(spec.weight(50, 0, 100, 100), 1.0);
    assert_eq!(spec.weight(99, 0, 100, 100), 1.0);
}

#[test]
fn gaussian_band_peaks_at_center() {
    let spec = RegionSpec::GaussianBand {
        axis: Axis::Vertical,
        center: 0.5,
        sigma: 0.1,
    };
    assert_eq!(spec.weight(3, 50, 10, 100), 1.0);
    assert!(spec.weight(3, 10, 10, 100) < 0.01);
}

#[test]
fn validation_rejects_bad_fractions() {
    assert!(
        RegionSpec::Columns { from: 0.8, to: 0.2 }
            .validate()
            .is_err()
    );
    assert!(
        RegionSpec::Wings(WingRegion {
            left_end: 1.5,
            ..WingRegion::default()
        })
        .validate()
        .is_err()
    );
    assert!(
        RegionSpec::Wings(WingRegion {
            taper: Taper::Power { exponent: 0.0 },
            ..WingRegion::default()
        })
        .validate()
        .is_err()
    );
    assert!(RegionSpec::default().validate().is_ok());
}

#[test]
fn weight_map_clamps_and_rejects_nan() {
    let loud = |_x: u32, _y: u32, _w: u32, _h: u32| 3.0f32;
    assert!(WeightMap::sample(2, 2, &loud).unwrap().as_slice().iter().all(|&w| w == 1.0));

    let broken = |x: u32, _y: u32, _w: u32, _h: u32| if x == 1 { f32::NAN } else { 0.0 };
    assert!(WeightMap::sample(2, 2, &broken).is_err());

    let none = |_x: u32, _y: u32, _w: u32, _h: u32| 0.0f32;
    assert!(WeightMap::sample(3, 3, &none).unwrap().is_static());
}

#[test]
fn region_spec_json_shape() {
    let spec: RegionSpec = serde_json::from_str(
        r#"{ "kind": "wings", "left_end": 0.32, "right_start": 0.68,
             "taper": { "kind": "power", "exponent": 1.1 }, "lower_start": 0.35 }"#,
    )
    .unwrap();
    let RegionSpec::Wings(w) = spec else {
        panic!("expected wings");
    };
    assert_eq!(w.taper, Taper::Power { exponent: 1.1 });
    assert_eq!(w.lower_start, Some(0.35));
    assert_eq!(w.vertical_taper, Taper::Linear);
}
