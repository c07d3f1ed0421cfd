/*!
 * Error types for the yascon application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while parsing or writing a subtitle track
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The source format is not one of the convertible kinds
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// Structural XML or line-grammar violation, e.g. missing header,
    /// premature EOF, unmatched tag
    #[error("Malformed subtitle document: {0}")]
    MalformedDocument(String),

    /// A timestamp token doesn't fit any recognized grammar
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    /// A recognized but unimplemented timestamp grammar, e.g. wallclock()
    #[error("Unsupported timestamp form: {0}")]
    UnsupportedTimestampForm(String),

    /// I/O failure on the input source or output sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for ConversionError {
    fn from(error: quick_xml::Error) -> Self {
        Self::MalformedDocument(error.to_string())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle conversion
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
