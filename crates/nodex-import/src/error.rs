//! Error types for reading export documents.

use thiserror::Error;

/// Errors that can occur when reading an export document.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// The `<nodes>` element is missing or carries another format version.
    #[error("unsupported format version {found:?}, expected \"{expected}\"")]
    UnsupportedFormatVersion {
        found: Option<String>,
        expected: &'static str,
    },

    /// A required element is missing.
    #[error("missing <{0}> element")]
    MissingElement(&'static str),

    /// A required attribute is missing.
    #[error("missing attribute \"{attribute}\" on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// Neither the caller nor the document names a target language.
    #[error("no target language given and none recorded in the document")]
    MissingTargetLanguage,
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, Error>;
