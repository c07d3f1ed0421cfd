/*!
 * Tests for the WebVTT cue reader
 */

use yascon::errors::ConversionError;
use yascon::subtitle::TimestampParsingOption;

use crate::common::webvtt_frames;

/// A single plain cue becomes one frame
#[test]
fn test_read_webvtt_withSingleCue_shouldYieldOneFrame() {
    let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.500\nHello world\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].start, 1_000);
    assert_eq!(frames[0].end, 2_500);
    assert_eq!(frames[0].text, "Hello world");
}

/// The WEBVTT header is mandatory
#[test]
fn test_read_webvtt_withMissingHeader_shouldFail() {
    let input = "00:00:01.000 --> 00:00:02.000\nHi\n\n";
    assert!(matches!(
        webvtt_frames(input, false, TimestampParsingOption::Ignore, None),
        Err(ConversionError::MalformedDocument(_))
    ));
}

/// An empty track (header only) yields nothing
#[test]
fn test_read_webvtt_withHeaderOnly_shouldYieldNoFrames() {
    let frames = webvtt_frames("WEBVTT\n", false, TimestampParsingOption::Ignore, None).unwrap();
    assert!(frames.is_empty());
}

/// YouTube-style extra header data is skipped up to the blank line
#[test]
fn test_read_webvtt_withHeaderMetadata_shouldSkipToBlankLine() {
    let input = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:00.000 --> 00:00:01.000\nHi\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].text, "Hi");
}

/// NOTE/STYLE/REGION blocks are consumed without producing frames
#[test]
fn test_read_webvtt_withNoteAndStyleBlocks_shouldSkipThem() {
    let input = "WEBVTT\n\nNOTE a comment\nspanning lines\n\nSTYLE\n::cue { color: red }\n\n00:00:00.000 --> 00:00:01.000\nHi\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].text, "Hi");
}

/// A cue identifier line is tolerated via the one-line lookahead
#[test]
fn test_read_webvtt_withCueIdentifier_shouldLookAheadOnce() {
    let input = "WEBVTT\n\nintro cue\n00:00:01.000 --> 00:00:02.000\nHi\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].start, 1_000);
}

/// Two non-timestamp lines in a row are a malformed document
#[test]
fn test_read_webvtt_withTwoBadLines_shouldFail() {
    let input = "WEBVTT\n\nnot a timestamp\nstill not one\nHi\n\n";
    assert!(matches!(
        webvtt_frames(input, false, TimestampParsingOption::Ignore, None),
        Err(ConversionError::MalformedDocument(_))
    ));
}

/// Multi-line cue text is joined with a canonical CRLF
#[test]
fn test_read_webvtt_withMultiLineCue_shouldJoinWithCrlf() {
    let input = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nline one\nline two\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames[0].text, "line one\r\nline two");
}

/// Inline styling survives, voice tags are stripped
#[test]
fn test_read_webvtt_withInlineMarkup_shouldStripSelectively() {
    let input = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\n<v Roger>Hello <b>world</b>\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames[0].text, "Hello <b>world</b>");
}

/// Ignore mode drops inline timestamp tags and keeps one frame
#[test]
fn test_read_webvtt_withInlineTimestampsIgnored_shouldYieldWholeCue() {
    let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.500\n<00:00:01.500>foo <00:00:02.000>bar\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].text, "foo bar");
}

/// Split mode yields an independent frame per tag-delimited segment
#[test]
fn test_read_webvtt_withInlineTimestampsSplit_shouldYieldSegments() {
    let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.500\n<00:00:01.500>foo <00:00:02.000>bar\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Split, None).unwrap();

    // the leading chunk before the first tag is empty here
    assert_eq!(frames.len(), 3);
    assert_eq!((frames[0].start, frames[0].end, frames[0].text.as_str()), (1_000, 1_500, ""));
    assert_eq!((frames[1].start, frames[1].end, frames[1].text.as_str()), (1_500, 2_000, "foo "));
    assert_eq!((frames[2].start, frames[2].end, frames[2].text.as_str()), (2_000, 2_500, "bar"));
}

/// Accumulate mode grows each frame with all prior text
#[test]
fn test_read_webvtt_withInlineTimestampsAccumulated_shouldGrowText() {
    let input = "WEBVTT\n\n00:00:01.000 --> 00:00:02.500\n<00:00:01.500>foo <00:00:02.000>bar\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Accumulate, None).unwrap();

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[1].text, "foo ");
    assert_eq!(frames[2].text, "foo bar");
}

/// Language spans are filtered before tag handling
#[test]
fn test_read_webvtt_withLanguageFilter_shouldDropForeignSpans() {
    let input =
        "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\n<lang de>Hallo</lang><lang en>Hello</lang>\n\n";
    let frames = webvtt_frames(input, false, TimestampParsingOption::Ignore, Some("en")).unwrap();

    assert_eq!(frames[0].text, "Hello");
}

/// Rolling-caption tracks drop each cue's duplicated first line
#[test]
fn test_read_webvtt_withRollingCaptions_shouldDropDuplicateLines() {
    // auto-generated tracks prime the window with a near-empty first line
    let input = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\n \nfirst caption\n\n00:00:01.000 --> 00:00:02.000\nfirst caption\nsecond caption\n\n00:00:02.000 --> 00:00:03.000\nsecond caption\nthird caption\n\n";
    let frames = webvtt_frames(input, true, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].text, "first caption");
    assert_eq!(frames[1].text, "second caption");
    assert_eq!(frames[2].text, "third caption");
}

/// A normal track permanently disables duplicate detection
#[test]
fn test_read_webvtt_withNormalTrack_shouldKeepAllLines() {
    let input = "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nplain line\n\n00:00:01.000 --> 00:00:02.000\nkeep this\nand this\n\n";
    let frames = webvtt_frames(input, true, TimestampParsingOption::Ignore, None).unwrap();

    assert_eq!(frames[0].text, "plain line");
    assert_eq!(frames[1].text, "keep this\r\nand this");
}
