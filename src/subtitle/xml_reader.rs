/*!
 * XML-based subtitle frame reader, shared by TTML and Transcript v3.
 *
 * Basic support only: one CUE per paragraph, no styling, no inline
 * timestamp tags, no language parsing. The two dialects differ only in
 * the parameterization: root tag, format marker (attribute or
 * namespace), frame element path, time attribute names, and whether
 * times are parsed timestamps or raw millisecond offsets.
 */

use std::io::Read;

use super::{Frame, FrameSink};
use crate::errors::ConversionError;
use crate::time_codec::parse_ttml_timestamp;
use crate::xml_document::XmlDocument;

const NEW_LINE: &str = "\r\n";

/// Read a TTML document (`tt` in the TTML namespace, frames at
/// `tt/body/div/p` with `begin`/`end` timestamps).
pub fn read_ttml<R: Read>(
    source: R,
    sink: &mut FrameSink<'_>,
    detect_youtube_duplicate_lines: bool,
) -> Result<(), ConversionError> {
    read_xml_frames(
        source,
        sink,
        detect_youtube_duplicate_lines,
        "tt",
        "xmlns",
        "http://www.w3.org/ns/ttml",
        &["tt", "body", "div", "p"],
        "begin",
        "end",
        true,
    )
}

/// Read a YouTube Transcript v3 document (`timedtext` with
/// `format="3"`, frames at `timedtext/body/p` with `t` start and `d`
/// duration in raw milliseconds).
pub fn read_transcript_v3<R: Read>(
    source: R,
    sink: &mut FrameSink<'_>,
) -> Result<(), ConversionError> {
    // duplicate-line detection doesn't apply to this dialect
    read_xml_frames(
        source,
        sink,
        false,
        "timedtext",
        "format",
        "3",
        &["timedtext", "body", "p"],
        "t",
        "d",
        false,
    )
}

#[allow(clippy::too_many_arguments)]
fn read_xml_frames<R: Read>(
    source: R,
    sink: &mut FrameSink<'_>,
    mut detect_youtube_duplicate_lines: bool,
    root: &str,
    format_attr: &str,
    format_version: &str,
    frame_path: &[&str],
    time_attr: &str,
    duration_attr: &str,
    has_timestamp: bool,
) -> Result<(), ConversionError> {
    let document = XmlDocument::from_reader(source)?;

    // the format marker comes first: either the root namespace or a
    // version attribute on the root element
    let mut selection = document.select_single_node(&[root])?.ok_or_else(|| {
        ConversionError::MalformedDocument("can't get the format version, wrong namespace?".to_string())
    })?;
    let node = selection.node();

    if format_attr == "xmlns" {
        if node.namespace() != Some(format_version) {
            return Err(ConversionError::UnsupportedFormat(format!(
                "expected xml namespace: {}",
                format_version
            )));
        }
    } else {
        let version = node.attribute(format_attr).ok_or_else(|| {
            ConversionError::MalformedDocument("can't get the format attribute".to_string())
        })?;
        if version != format_version {
            return Err(ConversionError::MalformedDocument(format!(
                "invalid format version: {}",
                version
            )));
        }
    }

    // maximum characters per line, if the head declares it (Transcript v3)
    let mut line_break = 0usize;
    if !has_timestamp {
        if let Some(mut hints) = document.select_nodes(&["timedtext", "head", "wp"])? {
            // with multiple CUE hints, use the highest value
            while let Some(hint) = hints.next_node()? {
                if let Some(columns) = hint.attribute("ah").and_then(|v| v.parse::<usize>().ok()) {
                    if columns > line_break {
                        line_break = columns;
                    }
                }
            }
        }
    }

    let Some(mut frames) = document.select_nodes(frame_path)? else {
        return Ok(()); // no frames detected
    };

    // rolling-caption repair state: end time of the previous frame, and
    // whether the overlap pattern has been confirmed
    let mut carried_end: i32 = -1;
    let mut limit_lines = false;

    while let Some(node) = frames.next_node()? {
        let start_value = node.attribute(time_attr).map(str::to_string);
        let duration_value = node.attribute(duration_attr).map(str::to_string);
        let text = node.inner_text()?;

        let start_value = start_value.ok_or_else(|| {
            ConversionError::MalformedDocument(format!("frame node missing '{}' attribute", time_attr))
        })?;
        let start = if has_timestamp {
            parse_ttml_timestamp(&start_value)?
        } else {
            start_value
                .parse::<i32>()
                .map_err(|_| ConversionError::MalformedTimestamp(start_value.clone()))?
        };

        let (Some(mut text), Some(duration_value)) = (text, duration_value) else {
            continue; // a blank line in auto-generated subtitles; ignore
        };

        let mut end;
        if has_timestamp {
            end = parse_ttml_timestamp(&duration_value)?;

            if detect_youtube_duplicate_lines {
                if limit_lines {
                    // swap in the previous frame's end time
                    let swap = end;
                    end = carried_end;
                    carried_end = swap;
                } else if carried_end < 0 {
                    carried_end = end;
                } else if carried_end < start {
                    limit_lines = true; // the subtitles have duplicated lines
                } else {
                    detect_youtube_duplicate_lines = false;
                }
            }
        } else {
            let duration = duration_value
                .parse::<i32>()
                .map_err(|_| ConversionError::MalformedTimestamp(duration_value.clone()))?;
            end = start + duration;
        }

        if line_break > 1 && text.chars().count() > line_break {
            text = break_long_line(&text, line_break);
        }

        sink(Frame::new(start, end, text))?;
    }

    Ok(())
}

// Insert a single line break at the nearest whitespace at or before the
// column limit. A long unbroken word is left alone.
fn break_long_line(text: &str, line_break: usize) -> String {
    let mut chars: Vec<char> = text.chars().collect();

    match chars[line_break] {
        ' ' | '\t' => put_break_at(&mut chars, line_break),
        _ => {
            // walk back to the start of the word
            let mut i = line_break - 1;
            while i > 0 {
                match chars[i] {
                    ' ' | '\t' => {
                        put_break_at(&mut chars, i);
                        break;
                    }
                    '\r' | '\n' => break,
                    _ => {}
                }
                i -= 1;
            }
        }
    }

    chars.into_iter().collect()
}

fn put_break_at(chars: &mut Vec<char>, idx: usize) {
    chars.splice(idx..=idx, NEW_LINE.chars());
}
