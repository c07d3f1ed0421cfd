/*!
 * Conversion driver: picks the reader/writer pair and owns the
 * catch-everything boundary.
 *
 * Conversion is best-effort by design. Whatever goes wrong inside a
 * reader or writer (malformed document, unparseable timestamp, sink I/O
 * failure) is caught here, logged, and reported as a boolean failure.
 * The host never sees an error escape this module.
 */

use std::io::{BufReader, Read, Write};

use log::error;

use super::webvtt_reader::read_webvtt;
use super::writers::{SubRipWriter, WebVttWriter};
use super::xml_reader::{read_transcript_v3, read_ttml};
use super::{Frame, FrameSink, SubtitleFormat, TimestampParsingOption};
use crate::errors::ConversionError;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Convert a subtitle stream to SubRip or cleaned WebVTT.
///
/// * `to_subrip`: SubRip output when true, WebVTT otherwise.
/// * `parse_option`: how embedded WebVTT timestamp tags are handled.
/// * `language_code`: WebVTT only, keep just the `<lang>` spans matching
///   this code; `None` keeps every language.
/// * `detect_youtube_duplicate_lines`: enable the rolling-caption repair
///   (not valid for Transcript v3, where it is ignored).
/// * `ignore_empty_frames`: drop whitespace-only frames from the output;
///   normally used together with duplicate detection.
///
/// `SubRip` input is already the target format and succeeds without
/// touching `source`. Returns true if the track was parsed and written
/// completely.
#[allow(clippy::too_many_arguments)]
pub fn convert<R: Read, W: Write>(
    source: R,
    format: SubtitleFormat,
    output: W,
    to_subrip: bool,
    parse_option: TimestampParsingOption,
    language_code: Option<&str>,
    detect_youtube_duplicate_lines: bool,
    ignore_empty_frames: bool,
) -> bool {
    if format == SubtitleFormat::SubRip {
        return true;
    }

    let result = convert_frames(
        source,
        format,
        output,
        to_subrip,
        parse_option,
        language_code,
        detect_youtube_duplicate_lines,
        ignore_empty_frames,
    );

    match result {
        Ok(()) => true,
        Err(err) => {
            error!("Subtitle conversion failed ({}): {}", format.display_name(), err);
            false
        }
    }
}

/// Error-typed core of [`convert`], for callers that want the cause.
#[allow(clippy::too_many_arguments)]
pub fn convert_frames<R: Read, W: Write>(
    source: R,
    format: SubtitleFormat,
    output: W,
    to_subrip: bool,
    parse_option: TimestampParsingOption,
    language_code: Option<&str>,
    detect_youtube_duplicate_lines: bool,
    ignore_empty_frames: bool,
) -> Result<(), ConversionError> {
    if to_subrip {
        let mut writer = SubRipWriter::new(output, ignore_empty_frames);
        let mut sink = |frame: Frame| writer.write_frame(&frame);
        read_frames(
            source,
            format,
            &mut sink,
            parse_option,
            language_code,
            detect_youtube_duplicate_lines,
        )
    } else {
        let mut writer = WebVttWriter::new(output, ignore_empty_frames)?;
        let mut sink = |frame: Frame| writer.write_frame(&frame);
        read_frames(
            source,
            format,
            &mut sink,
            parse_option,
            language_code,
            detect_youtube_duplicate_lines,
        )
    }
}

fn read_frames<R: Read>(
    source: R,
    format: SubtitleFormat,
    sink: &mut FrameSink<'_>,
    parse_option: TimestampParsingOption,
    language_code: Option<&str>,
    detect_youtube_duplicate_lines: bool,
) -> Result<(), ConversionError> {
    match format {
        SubtitleFormat::WebVtt => read_webvtt(
            BufReader::with_capacity(READ_BUFFER_SIZE, source),
            sink,
            detect_youtube_duplicate_lines,
            parse_option,
            language_code,
        ),
        SubtitleFormat::Ttml => read_ttml(source, sink, detect_youtube_duplicate_lines),
        SubtitleFormat::Transcript3 => read_transcript_v3(source, sink),
        SubtitleFormat::SubRip => Err(ConversionError::UnsupportedFormat(
            "SubRip input needs no conversion".to_string(),
        )),
    }
}
