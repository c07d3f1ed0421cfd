use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the subtitle language filter
///
/// This module validates the ISO 639 code given on the command line and
/// implements the matching rule used when stripping `<lang>` spans from
/// WebVTT cue text.
/// Validate that a filter is a plausible language code or tag.
///
/// Accepts ISO 639-1 (2-letter) and ISO 639-3 (3-letter) codes, optionally
/// carrying a region suffix (`en-US`). Returns the code unchanged; the
/// filter is matched against span values verbatim, never normalized.
pub fn validate_language_code(code: &str) -> Result<&str> {
    let primary = code.split('-').next().unwrap_or(code).to_lowercase();

    let known = match primary.len() {
        2 => Language::from_639_1(&primary).is_some(),
        3 => Language::from_639_3(&primary).is_some(),
        _ => false,
    };

    if known {
        Ok(code)
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}

/// Check whether a `<lang>` span's language value matches the filter.
///
/// A span matches on exact equality, on a trailing match (`filter "US"`
/// matches `en-US`), or on the primary subtag (`filter "en"` matches
/// `en-US`).
pub fn span_language_matches(value: &str, filter: &str) -> bool {
    value == filter || value.ends_with(filter) || value.split('-').next() == Some(filter)
}

/// Get the English name for a language code, for log messages
pub fn get_language_name(code: &str) -> Result<String> {
    let primary = code.split('-').next().unwrap_or(code).to_lowercase();

    let lang = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(&primary),
        _ => None,
    };

    lang.map(|l| l.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}
