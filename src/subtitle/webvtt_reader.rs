/*!
 * WebVTT cue reader.
 *
 * Line-oriented with regex timestamp matching. Support is deliberately
 * partial: cue payload text tags and CSS pseudo-classes are handled,
 * REGION blocks are skipped, voice tags are stripped, and the server is
 * trusted to send the requested default language. YouTube's habit of
 * injecting extra data right after the `WEBVTT` header is tolerated by
 * skipping everything up to the first blank line.
 */

use std::io::BufRead;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Frame, FrameSink, TimestampParsingOption};
use crate::errors::ConversionError;
use crate::markup::{strip_language_spans, strip_tags};
use crate::time_codec::parse_webvtt_timestamp;

const NEW_LINE: &str = "\r\n";

// A timestamp line can be confused with a cue identifier; matching with a
// regex is the slow-but-sure way to tell them apart.
static CUE_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((?:\d{2}:)?\d{2}:\d{2}\.\d{3})\s+-->\s+((?:\d{2}:)?\d{2}:\d{2}\.\d{3})(?:\s+)?")
        .unwrap()
});

// Embedded per-word tags inside cue text: <00:00:01.500>
static INLINE_TIMESTAMP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<((?:\d{2}:)?\d{2}:\d{2}\.\d{3})>").unwrap());

// Inline-tag occurrence inside accumulated cue text; byte offsets.
struct TagMatch {
    start: usize,
    text: String,
}

/// Read a WebVTT stream and push one or more [`Frame`]s per cue into
/// `sink`.
///
/// `detect_youtube_duplicate_lines` enables the rolling-caption repair:
/// auto-generated tracks repeat the previous cue's last line as each
/// cue's first line, so once the pattern is confirmed the first line of
/// every subsequent cue is dropped.
pub fn read_webvtt<R: BufRead>(
    source: R,
    sink: &mut FrameSink<'_>,
    mut detect_youtube_duplicate_lines: bool,
    parse_option: TimestampParsingOption,
    language_code: Option<&str>,
) -> Result<(), ConversionError> {
    let mut lines = source.lines();
    let mut next_line = move || -> Result<Option<String>, ConversionError> {
        lines.next().transpose().map_err(ConversionError::from)
    };

    let header = next_line()?.unwrap_or_default();
    if !header.starts_with("WEBVTT") {
        return Err(ConversionError::MalformedDocument(
            "WebVTT header missing".to_string(),
        ));
    }

    // extra header data goes until the first blank line
    loop {
        match next_line()? {
            None => return Ok(()), // empty subtitles
            Some(line) if line.is_empty() => break,
            Some(_) => {}
        }
    }

    let collect_tags = parse_option != TimestampParsingOption::Ignore;
    let mut skip = false;
    let mut enable_ignore_first_line = false;

    while let Some(raw_line) = next_line()? {
        // handwritten subtitles tend to carry stray trailing whitespace
        let line = raw_line.trim_end_matches([' ', '\t', '\r', '\n']).to_string();

        if skip {
            skip = !line.is_empty();
            continue;
        }

        if line.starts_with("STYLE") || line.starts_with("NOTE") || line.starts_with("REGION") {
            skip = true;
            continue;
        }
        if line.is_empty() {
            // don't flag skip here, the next line is still meaningful
            continue;
        }

        let (start_text, end_text) = match cue_timing(&line) {
            Some(timing) => timing,
            None => {
                // not a timestamp line; allow exactly one lookahead
                let Some(lookahead) = next_line()? else { break };
                if lookahead.is_empty() {
                    break; // EOF reached or corrupt WebVTT data
                }
                match cue_timing(&lookahead) {
                    Some(timing) => timing,
                    None => {
                        return Err(ConversionError::MalformedDocument(
                            "invalid WebVTT timestamps line".to_string(),
                        ));
                    }
                }
            }
        };

        let frame_start = parse_webvtt_timestamp(&start_text)?;
        let frame_end = parse_webvtt_timestamp(&end_text)?;

        // accumulate the cue text
        let mut text = String::with_capacity(128);
        let mut first_line_len: Option<(usize, usize)> = None; // (chars, bytes)
        let mut line_count = 0;
        let mut ignore_first_line = enable_ignore_first_line;

        loop {
            let Some(cue_line) = next_line()? else { break };
            if cue_line.is_empty() {
                break;
            }

            if detect_youtube_duplicate_lines {
                if ignore_first_line {
                    ignore_first_line = false;
                    continue;
                }
                if first_line_len.is_none() {
                    first_line_len = Some((cue_line.chars().count(), cue_line.len()));
                }
            }

            line_count += 1;
            text.push_str(&cue_line);
            // the source may use '\r\n' or bare '\n'; both become NEW_LINE
            text.push_str(NEW_LINE);
        }

        if !enable_ignore_first_line && detect_youtube_duplicate_lines {
            let (first_chars, first_bytes) = first_line_len.unwrap_or((0, 0));
            if line_count < 2 || first_chars > 1 {
                // not the rolling-caption shape; give up for the whole track
                detect_youtube_duplicate_lines = false;
            } else {
                enable_ignore_first_line = true;
                text.replace_range(..first_bytes + NEW_LINE.len(), "");
            }
        }

        if text.len() >= NEW_LINE.len() {
            text.truncate(text.len() - NEW_LINE.len()); // residual separator
        }

        if let Some(code) = language_code {
            text = strip_language_spans(&text, code);
        }

        let mut tag_matches: Vec<TagMatch> = Vec::new();
        if collect_tags {
            for found in INLINE_TIMESTAMP_REGEX.find_iter(&text) {
                tag_matches.push(TagMatch {
                    start: found.start(),
                    text: found.as_str().to_string(),
                });
            }
        }

        if tag_matches.is_empty() {
            // the whole cue is one frame
            sink(Frame::new(frame_start, frame_end, strip_tags(&text)))?;
            continue;
        }

        // first chunk runs up to the first tag
        let first = Frame::new(
            frame_start,
            parse_time_tag(&tag_matches[0].text)?,
            strip_tags(&text[..tag_matches[0].start]),
        );
        let mut accumulated = match parse_option {
            TimestampParsingOption::Accumulate => Some(first.text.clone()),
            _ => None,
        };
        sink(first)?;

        // then every consecutive chunk
        for i in 0..tag_matches.len() {
            let start = parse_time_tag(&tag_matches[i].text)?;
            let (end, segment_end) = if i + 1 >= tag_matches.len() {
                (frame_end, text.len())
            } else {
                (
                    parse_time_tag(&tag_matches[i + 1].text)?,
                    tag_matches[i + 1].start,
                )
            };

            let chunk = strip_tags(&text[tag_matches[i].start..segment_end]);
            let frame_text = match &mut accumulated {
                None => chunk,
                Some(all) => {
                    all.push_str(&chunk);
                    all.clone()
                }
            };

            sink(Frame::new(start, end, frame_text))?;
        }
    }

    Ok(())
}

fn cue_timing(line: &str) -> Option<(String, String)> {
    let caps = CUE_TIMING_REGEX.captures(line)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

// "<00:00:01.500>" → ms of the bracketed timestamp
fn parse_time_tag(tag: &str) -> Result<i32, ConversionError> {
    parse_webvtt_timestamp(&tag[1..tag.len() - 1])
}
