//! Errors returned while reporting on or normalizing a font.

use std::path::PathBuf;

use read_fonts::{types::Tag, ReadError};
use thiserror::Error;

/// An error that aborts a report or a normalization.
///
/// None of these are recoverable: when one is returned no output file has
/// been written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A table that holds one of the vertical metrics is missing or could
    /// not be parsed.
    #[error("missing or malformed '{tag}' table: {source}")]
    MissingRequiredField { tag: Tag, source: ReadError },
    /// The font data is not a single OpenType font.
    #[error("unable to parse font data: {0}")]
    MalformedFont(ReadError),
    /// `head.unitsPerEm` is zero.
    #[error("invalid units per em value {0}, expected a value greater than zero")]
    InvalidGridSize(u16),
    /// The requested line spacing is not a non-negative integer.
    #[error("invalid line spacing percent '{0}', expected a non-negative integer")]
    MalformedPercent(String),
    /// A computed value does not fit in the field it is written to.
    #[error("computed {field} value {value} is out of range for the field")]
    ValueOutOfRange { field: &'static str, value: i64 },
    #[error("unable to read '{}': {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to write '{}': {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn missing(tag: Tag, source: ReadError) -> Self {
        Error::MissingRequiredField { tag, source }
    }
}
