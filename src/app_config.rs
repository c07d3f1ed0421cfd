use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fmt;
use std::str::FromStr;

use crate::subtitle::TimestampParsingOption;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving conversion settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target format to emit
    #[serde(default)]
    pub output_format: OutputFormat,

    /// How embedded WebVTT timestamp tags are handled
    #[serde(default)]
    pub timestamp_parsing: TimestampParsingOption,

    /// Language filter for WebVTT `<lang>` spans (ISO code), if any
    #[serde(default)]
    pub language_filter: Option<String>,

    /// Detect and repair YouTube rolling-caption duplicate lines
    #[serde(default)]
    pub detect_youtube_duplicates: bool,

    /// Drop whitespace-only frames from the output
    #[serde(default = "default_true")]
    pub ignore_empty_frames: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Target subtitle format
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: SubRip (*.srt)
    #[default]
    SubRip,
    // @format: cleaned WebVTT (*.vtt)
    WebVtt,
}

impl OutputFormat {
    // @returns: true when the target is SubRip
    pub fn is_subrip(&self) -> bool {
        matches!(self, Self::SubRip)
    }

    // @returns: Output file extension
    pub fn extension(&self) -> &str {
        match self {
            Self::SubRip => "srt",
            Self::WebVtt => "vtt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubRip => write!(f, "subrip"),
            Self::WebVtt => write!(f, "webvtt"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "srt" | "subrip" => Ok(Self::SubRip),
            "vtt" | "webvtt" => Ok(Self::WebVtt),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if let Some(filter) = &self.language_filter {
            crate::language_utils::validate_language_code(filter)?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            output_format: OutputFormat::default(),
            timestamp_parsing: TimestampParsingOption::default(),
            language_filter: None,
            detect_youtube_duplicates: false,
            ignore_empty_frames: default_true(),
            log_level: LogLevel::default(),
        }
    }
}
