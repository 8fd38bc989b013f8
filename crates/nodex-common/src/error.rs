//! Error types for nodex-common.

use thiserror::Error;

/// Common error type for nodex operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A content path was not absolute.
    #[error("invalid node path \"{0}\": paths must start with '/'")]
    RelativePath(String),

    /// A content path contained an empty segment.
    #[error("invalid node path \"{0}\": empty path segment")]
    EmptySegment(String),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
