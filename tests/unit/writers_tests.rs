/*!
 * Tests for the SubRip and WebVTT frame writers
 */

use yascon::subtitle::Frame;
use yascon::subtitle::writers::{SubRipWriter, WebVttWriter};

fn frame(start: i32, end: i32, text: &str) -> Frame {
    Frame::new(start, end, text.to_string())
}

/// SubRip blocks carry a 1-based sequential index
#[test]
fn test_subrip_writer_withTwoFrames_shouldNumberFromOne() {
    let mut output: Vec<u8> = Vec::new();
    let mut writer = SubRipWriter::new(&mut output, false);

    writer.write_frame(&frame(1_000, 2_500, "Hello")).unwrap();
    writer.write_frame(&frame(3_000, 4_000, "World")).unwrap();
    drop(writer);

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "1\r\n00:00:01,000 --> 00:00:02,500\r\nHello\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nWorld\r\n\r\n"
    );
}

/// Empty frames can be skipped without consuming an index
#[test]
fn test_subrip_writer_withEmptyFrameSkipping_shouldNotConsumeIndex() {
    let mut output: Vec<u8> = Vec::new();
    let mut writer = SubRipWriter::new(&mut output, true);

    writer.write_frame(&frame(0, 500, " \t")).unwrap();
    writer.write_frame(&frame(1_000, 2_000, "kept")).unwrap();
    drop(writer);

    let text = String::from_utf8(output).unwrap();
    assert!(text.starts_with("1\r\n00:00:01,000"));
    assert!(!text.contains("00:00:00,000"));
}

/// SubRip output carries no styling markers
#[test]
fn test_subrip_writer_withStyledText_shouldDropMarkers() {
    let mut output: Vec<u8> = Vec::new();
    let mut writer = SubRipWriter::new(&mut output, false);

    writer.write_frame(&frame(0, 1_000, "Hello <b>world</b>")).unwrap();
    drop(writer);

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Hello world"));
    assert!(!text.contains("<b>"));
}

/// The WebVTT header is written once, up front
#[test]
fn test_webvtt_writer_withNoFrames_shouldStillEmitHeader() {
    let mut output: Vec<u8> = Vec::new();
    let writer = WebVttWriter::new(&mut output, false).unwrap();
    drop(writer);

    assert_eq!(String::from_utf8(output).unwrap(), "WEBVTT\r\n");
}

/// Cue text is XML-escaped while styling markers survive
#[test]
fn test_webvtt_writer_withMarkupAndLiterals_shouldEscapeSelectively() {
    let mut output: Vec<u8> = Vec::new();
    let mut writer = WebVttWriter::new(&mut output, false).unwrap();

    writer.write_frame(&frame(1_000, 2_500, "5 < 6 & <b>bold</b>")).unwrap();
    drop(writer);

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "WEBVTT\r\n00:00:01.000 --> 00:00:02.500\r\n5 &lt; 6 &amp; <b>bold</b>\r\n\r\n"
    );
}

/// WebVTT times use the dot separator
#[test]
fn test_webvtt_writer_withFrame_shouldUseDotMilliseconds() {
    let mut output: Vec<u8> = Vec::new();
    let mut writer = WebVttWriter::new(&mut output, false).unwrap();

    writer.write_frame(&frame(61_234, 65_432, "x")).unwrap();
    drop(writer);

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("00:01:01.234 --> 00:01:05.432"));
}
