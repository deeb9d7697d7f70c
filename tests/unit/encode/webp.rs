use super::*;

fn cfg(background: Option<[u8; 4]>) -> SinkConfig {
    SinkConfig {
        width: 3,
        height: 2,
        frame_delay_ms: 55,
        loop_count: 0,
        background,
    }
}

fn u24(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], 0])
}

#[test]
fn container_layout() {
    let frames = vec![[255, 0, 0, 255].repeat(6), [0, 255, 0, 128].repeat(6)];
    let bytes = encode_animated_webp(&cfg(None), &frames).unwrap();
    let riff_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    assert_eq!(riff_len + 8, bytes.len());

    let chunks = riff_chunks(&bytes).unwrap();
    let names: Vec<[u8; 4]> = chunks.iter().map(|(f, _)| *f).collect();
    assert_eq!(names, vec![*b"VP8X", *b"ANIM", *b"ANMF", *b"ANMF"]);

    let vp8x = chunks[0].1;
    assert_eq!(vp8x[0], VP8X_FLAG_ANIMATION | VP8X_FLAG_ALPHA);
    assert_eq!(u24(&vp8x[4..7]), 2);
    assert_eq!(u24(&vp8x[7..10]), 1);

    let anim = chunks[1].1;
    assert_eq!(&anim[4..6], &[0, 0]);

    let anmf = chunks[2].1;
    assert_eq!(u24(&anmf[0..3]), 0);
    assert_eq!(u24(&anmf[6..9]), 2);
    assert_eq!(u24(&anmf[9..12]), 1);
    assert_eq!(u24(&anmf[12..15]), 55);
    assert_eq!(anmf[15], ANMF_NO_BLEND);
    assert!(&anmf[16..20] == b"VP8L" || &anmf[16..20] == b"VP8 ");
}

#[test]
fn background_is_stored_bgra_and_clears_alpha_flag() {
    let frames = vec![[10, 20, 30, 255].repeat(6)];
    let bytes = encode_animated_webp(&cfg(Some([1, 2, 3, 255])), &frames).unwrap();
    let chunks = riff_chunks(&bytes).unwrap();
    assert_eq!(chunks[0].1[0], VP8X_FLAG_ANIMATION);
    assert_eq!(&chunks[1].1[..4], &[3, 2, 1, 255]);
}

#[test]
fn output_decodes_as_animation() {
    use image::AnimationDecoder as _;

    let frames = vec![
        [200, 10, 10, 255].repeat(6),
        [10, 200, 10, 255].repeat(6),
        [10, 10, 200, 255].repeat(6),
    ];
    let bytes = encode_animated_webp(&cfg(None), &frames).unwrap();
    let decoder =
        image::codecs::webp::WebPDecoder::new(std::io::Cursor::new(bytes)).unwrap();
    let decoded = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded[1].buffer().get_pixel(2, 1).0, [10, 200, 10, 255]);
    let (num, den) = decoded[0].delay().numer_denom_ms();
    assert_eq!(num / den, 55);
}

#[test]
fn odd_chunks_are_padded() {
    let mut out = Vec::new();
    push_chunk(&mut out, b"TEST", &[1, 2, 3]);
    assert_eq!(out.len(), 12);
    assert_eq!(out[11], 0);
}

#[test]
fn truncated_stream_is_rejected() {
    let mut bytes = b"RIFF\x10\0\0\0WEBPVP8L\xff\0\0\0".to_vec();
    bytes.push(0);
    assert!(riff_chunks(&bytes).is_err());
    assert!(riff_chunks(b"nope").is_err());
}

#[test]
fn oversized_canvas_is_rejected_on_begin() {
    let mut sink = WebpSink::new(std::env::temp_dir().join("never_written.webp"));
    let big = SinkConfig {
        width: MAX_WEBP_DIMENSION + 1,
        ..cfg(None)
    };
    assert!(sink.begin(big).is_err());
}
