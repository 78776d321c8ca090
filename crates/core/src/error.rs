//! Error types for speaker-notes extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting notes from a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The input is not a valid ZIP container, or a required member is missing.
    #[error("Archive read error: {0}")]
    ArchiveRead(String),

    /// The MIME declaration is not one of the presentation subtypes.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The content stream is not well-formed XML.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

impl Error {
    /// Whether this error means the input was the wrong kind of document,
    /// as opposed to a damaged or unreadable one.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat(_))
    }
}
