use image::AnimationDecoder as _;

use super::*;

fn cfg(loop_count: u16) -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 3,
        frame_delay_ms: 40,
        loop_count,
        background: None,
    }
}

fn solid(px: [u8; 4]) -> Vec<u8> {
    px.repeat(12)
}

#[test]
fn encodes_decodable_gif_with_delay() {
    let frames = vec![solid([255, 0, 0, 255]), solid([0, 0, 255, 255])];
    let bytes = encode_gif(&cfg(0), frames, DEFAULT_GIF_SPEED).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 2);
    let (num, den) = frames[0].delay().numer_denom_ms();
    assert_eq!(num / den, 40);
    let first = frames[0].buffer().get_pixel(1, 1).0;
    assert!(first[0] > 200 && first[2] < 50);
    let second = frames[1].buffer().get_pixel(1, 1).0;
    assert!(second[2] > 200 && second[0] < 50);
}

#[test]
fn infinite_loop_writes_netscape_extension() {
    let bytes = encode_gif(&cfg(0), vec![solid([0, 0, 0, 255])], DEFAULT_GIF_SPEED).unwrap();
    assert!(bytes.windows(11).any(|w| w == b"NETSCAPE2.0"));
}

#[test]
fn wrong_frame_size_is_an_encode_error() {
    let err = encode_gif(&cfg(0), vec![vec![0; 4]], DEFAULT_GIF_SPEED).unwrap_err();
    assert!(matches!(err, WingbeatError::Encode(_)));
}
