use super::*;

#[test]
fn bright_opaque_pixels_are_darkened_and_kept() {
    let c = Cutout::default();
    assert_eq!(c.apply_pixel([250, 250, 250, 255]), [162, 162, 162, 255]);
}

#[test]
fn light_translucent_pixels_are_removed() {
    let c = Cutout::default();
    let out = c.apply_pixel([250, 250, 250, 40]);
    assert_eq!(out[3], 0);
}

#[test]
fn dark_pixels_are_untouched() {
    let c = Cutout::default();
    assert_eq!(c.apply_pixel([10, 80, 30, 255]), [10, 80, 30, 255]);
}

#[test]
fn darken_one_removes_white_background() {
    let c = Cutout {
        darken: 1.0,
        ..Cutout::default()
    };
    assert_eq!(c.apply_pixel([255, 255, 255, 255])[3], 0);
}

#[test]
fn apply_keeps_dimensions() {
    let src = SourceImage::from_rgba_image(image::RgbaImage::from_fn(3, 2, |x, _| {
        if x == 0 {
            image::Rgba([255, 255, 255, 30])
        } else {
            image::Rgba([20, 20, 20, 255])
        }
    }))
    .unwrap();
    let out = Cutout::default().apply(&src).unwrap();
    assert_eq!((out.width, out.height), (3, 2));
    assert_eq!(out.pixel(0, 0)[3], 0);
    assert_eq!(out.pixel(1, 1), [20, 20, 20, 255]);
}

#[test]
fn validate_ranges() {
    assert!(Cutout::default().validate().is_ok());
    let bad = Cutout {
        darken: 1.5,
        ..Cutout::default()
    };
    assert!(bad.validate().is_err());
}
