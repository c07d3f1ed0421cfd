/*!
 * Subtitle frame model, format readers, writers and the conversion driver.
 *
 * A reader turns one wire format (WebVTT, TTML, Transcript v3) into a
 * sequence of [`Frame`] values pushed through a callback sink; a writer
 * consumes frames and serializes SubRip or WebVTT to a byte sink. The
 * [`converter`] module wires a reader to a writer and owns the
 * catch-everything boundary.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::errors::ConversionError;

pub mod converter;
pub mod webvtt_reader;
pub mod writers;
pub mod xml_reader;

pub use converter::convert;

/// One normalized timed-text unit: millisecond range plus cue text.
///
/// Offsets are conceptually unsigned but carried as `i32`; `end >= start`
/// is expected but never enforced, since malformed input can violate it.
/// Frames are created once by a reader, consumed once by a writer, and
/// never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Start time in ms
    pub start: i32,

    /// End time in ms
    pub end: i32,

    /// Cue text; may still carry inline `<b>`/`<i>`/`<u>` markup
    pub text: String,
}

impl Frame {
    pub fn new(start: i32, end: i32, text: String) -> Self {
        Frame { start, end, text }
    }

    /// True when the text is empty or whitespace-only.
    pub fn is_empty_text(&self) -> bool {
        self.text
            .chars()
            .all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
    }
}

/// Callback sink a reader pushes frames into.
pub type FrameSink<'a> = dyn FnMut(Frame) -> Result<(), ConversionError> + 'a;

/// Source subtitle format, supplied by the caller (never sniffed from
/// content by the engine itself).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// WebVTT (*.vtt)
    #[default]
    WebVtt,
    /// TTML (*.ttml)
    Ttml,
    /// YouTube "srv3" timedtext XML
    Transcript3,
    /// SubRip (*.srt); already the target format, so conversion is a no-op
    SubRip,
}

impl SubtitleFormat {
    pub fn display_name(&self) -> &str {
        match self {
            Self::WebVtt => "WebVTT",
            Self::Ttml => "TTML",
            Self::Transcript3 => "Transcript v3",
            Self::SubRip => "SubRip",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::WebVtt => "webvtt",
            Self::Ttml => "ttml",
            Self::Transcript3 => "transcript3",
            Self::SubRip => "subrip",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "vtt" | "webvtt" => Ok(Self::WebVtt),
            "ttml" => Ok(Self::Ttml),
            "srv3" | "transcript3" => Ok(Self::Transcript3),
            "srt" | "subrip" => Ok(Self::SubRip),
            _ => Err(anyhow!("Invalid subtitle format: {}", s)),
        }
    }
}

/// How embedded per-word timestamp tags inside a WebVTT cue are handled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimestampParsingOption {
    /// Don't split on tags; one frame per cue
    Ignore,
    /// One independent frame per tag-delimited segment
    Split,
    /// Karaoke-style growth: each segment appends to all prior text
    #[default]
    Accumulate,
}

impl fmt::Display for TimestampParsingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Ignore => "ignore",
            Self::Split => "split",
            Self::Accumulate => "accumulate",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for TimestampParsingOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "split" => Ok(Self::Split),
            "accumulate" => Ok(Self::Accumulate),
            _ => Err(anyhow!("Invalid timestamp parsing option: {}", s)),
        }
    }
}
