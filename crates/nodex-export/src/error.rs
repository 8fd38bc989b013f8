//! Error types for export.

use thiserror::Error;

/// Errors that can occur while exporting a content subtree.
#[derive(Debug, Error)]
pub enum Error {
    /// The first segment of the starting point names no site.
    #[error("no site found for node name \"{0}\"")]
    SiteNotFound(String),

    /// The starting point does not resolve in any source combination.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No dimension combination has the requested source language.
    #[error("no dimension combination has {dimension} \"{language}\"")]
    UnknownSourceLanguage { dimension: String, language: String },

    /// Content store error.
    #[error("{0}")]
    Store(#[from] nodex_store::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] nodex_common::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dimension or property name cannot be written as an element name.
    #[error("\"{0}\" is not a valid XML element name")]
    InvalidXmlName(String),

    /// XML writing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// UTF-8 encoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Settings file could not be decoded.
    #[error("invalid settings: {0}")]
    Settings(#[from] toml::de::Error),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, Error>;
