use super::*;

#[test]
fn canvas_rejects_zero_size() {
    assert!(Canvas::new(0, 4).is_err());
    assert!(Canvas::new(4, 0).is_err());
    let c = Canvas::new(3, 2).unwrap();
    assert_eq!(c.pixel_count(), 6);
    assert_eq!(c.rgba8_len().unwrap(), 24);
}

#[test]
fn check_rgba8_reports_mismatch_as_shape_error() {
    let c = Canvas::new(2, 2).unwrap();
    assert!(c.check_rgba8(&[0u8; 16]).is_ok());
    let err = c.check_rgba8(&[0u8; 15]).unwrap_err();
    assert!(matches!(err, WingbeatError::Shape(_)));
}

#[test]
fn frame_index_orders_by_value() {
    assert!(FrameIndex(1) < FrameIndex(2));
    assert_eq!(FrameIndex(3).max(FrameIndex(2)), FrameIndex(3));
}
