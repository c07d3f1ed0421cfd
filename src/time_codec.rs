/*!
 * Timestamp parsing and formatting across the supported subtitle grammars.
 *
 * Three grammars are hand-parsed here: SubRip/WebVTT display times
 * (`HH:MM:SS,mmm` / `[HH:]MM:SS.mmm`) and the two TTML forms, clock-time
 * (`HH:MM:SS[.frac]`) and offset-time (`10.5s`, `1h`, `500ms`).
 *
 * Millisecond offsets are carried as `i32`. The values are conceptually
 * unsigned; negative or wrapped values from arithmetic on hostile input are
 * a known latent defect of the format, not something this module widens
 * away.
 */

use crate::errors::ConversionError;

/// Format a millisecond offset as a SubRip timestamp, `HH:MM:SS,mmm`.
pub fn format_srt_time(ms: i32) -> String {
    format_time(ms, true)
}

/// Format a millisecond offset as a WebVTT timestamp, `HH:MM:SS.mmm`.
pub fn format_vtt_time(ms: i32) -> String {
    format_time(ms, false)
}

// Fields are truncating integer divisions; no rounding anywhere.
fn format_time(ms: i32, comma: bool) -> String {
    let hours = ms / 1000 / 3600;
    let minutes = ms / 1000 / 60 % 60;
    let seconds = ms / 1000 % 60;
    let millis = ms % 1000;
    let sep = if comma { ',' } else { '.' };

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, sep, millis)
}

/// Parse a WebVTT timestamp, `[HH:]MM:SS.mmm`, to milliseconds.
///
/// Components are right-aligned: one, two or three colon-separated groups
/// are accepted. The final group is parsed as a literal digit string with
/// the decimal point removed, never as a float, so millisecond precision
/// is exact.
pub fn parse_webvtt_timestamp(text: &str) -> Result<i32, ConversionError> {
    let units: Vec<&str> = text.split(':').collect();
    let mut time = 0i32;

    let parse_int = |part: &str| -> Result<i32, ConversionError> {
        part.parse::<i32>()
            .map_err(|_| ConversionError::MalformedTimestamp(text.to_string()))
    };

    match units.len() {
        1..=3 => {
            if units.len() == 3 {
                time += parse_int(units[units.len() - 3])? * 3_600_000;
            }
            if units.len() >= 2 {
                time += parse_int(units[units.len() - 2])? * 60_000;
            }
            time += parse_int(&units[units.len() - 1].replace('.', ""))?;
        }
        _ => {
            return Err(ConversionError::MalformedTimestamp(format!(
                "invalid WebVTT timestamp length: {}",
                text
            )));
        }
    }

    Ok(time)
}

/// Parse a TTML timestamp to milliseconds.
///
/// Dispatches on content: empty means zero, a single digit means whole
/// seconds, `wallclock(...)` is recognized but unimplemented, anything
/// without a colon is an offset-time with a metric suffix, and anything
/// with colons is a clock-time with at least three groups. Frames and
/// sub-frames suffixes on clock-times are ignored.
pub fn parse_ttml_timestamp(text: &str) -> Result<i32, ConversionError> {
    if text.is_empty() {
        return Ok(0);
    }
    if text.len() == 1 {
        let seconds = text
            .parse::<i32>()
            .map_err(|_| ConversionError::MalformedTimestamp(text.to_string()))?;
        return Ok(seconds * 1000);
    }

    if text.starts_with("wallclock(") {
        return Err(ConversionError::UnsupportedTimestampForm(format!(
            "wallclock timestamps are not implemented: {}",
            text
        )));
    }

    if !text.contains(':') {
        return parse_offset_time(text);
    }

    parse_clock_time(text)
}

// Offset-time: numeric magnitude plus a metric suffix among h/m/s/ms.
// A bare trailing digit means seconds with an optional fraction.
fn parse_offset_time(text: &str) -> Result<i32, ConversionError> {
    let chars: Vec<char> = text.chars().collect();
    let metric = chars[chars.len() - 1];

    let (factor, suffix_len) = match metric {
        'h' => (3_600_000f64, 1),
        'm' => (60_000f64, 1),
        's' => {
            if chars[chars.len() - 2] == 'm' {
                (1f64, 2)
            } else {
                (1000f64, 1)
            }
        }
        _ => {
            if !metric.is_ascii_digit() {
                return Err(ConversionError::MalformedTimestamp(format!(
                    "invalid metric suffix on: {}",
                    text
                )));
            }
            (1000f64, 0)
        }
    };

    let magnitude: &str = &text[..text.len() - suffix_len];
    let value = magnitude
        .parse::<f64>()
        .map_err(|_| ConversionError::MalformedTimestamp(text.to_string()))?;

    let ms = value * factor;
    if !ms.is_finite() || ms.abs() > i32::MAX as f64 {
        return Err(ConversionError::MalformedTimestamp(format!(
            "offset-time out of range: {}",
            text
        )));
    }

    Ok(ms as i32)
}

// Clock-time: exactly HH:MM:SS[.frac]; extra groups (frames) are ignored.
fn parse_clock_time(text: &str) -> Result<i32, ConversionError> {
    let units: Vec<&str> = text.split(':').collect();

    if units.len() < 3 {
        return Err(ConversionError::MalformedTimestamp(format!(
            "invalid clock-time timestamp: {}",
            text
        )));
    }

    let hours = units[0]
        .parse::<i32>()
        .map_err(|_| ConversionError::MalformedTimestamp(text.to_string()))?;
    let minutes = units[1]
        .parse::<i32>()
        .map_err(|_| ConversionError::MalformedTimestamp(text.to_string()))?;
    let seconds = units[2]
        .parse::<f32>()
        .map_err(|_| ConversionError::MalformedTimestamp(text.to_string()))?;

    let mut time = 0i32;
    time += hours * 3_600_000;
    time += minutes * 60_000;
    time += (seconds * 1000f32) as i32;

    Ok(time)
}
