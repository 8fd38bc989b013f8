//! Error types for content store access.

use thiserror::Error;

/// Errors that can occur when reading from a content store.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] nodex_common::Error),

    /// Snapshot file could not be decoded.
    #[error("invalid store snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Node type filter string could not be parsed.
    #[error("invalid node type filter \"{0}\"")]
    InvalidNodeTypeFilter(String),

    /// Two records claim the same variant of one node.
    #[error("duplicate variant of node {identifier} in workspace \"{workspace}\" ({dimensions})")]
    DuplicateVariant {
        identifier: String,
        workspace: String,
        dimensions: String,
    },

    /// A dimension was declared without presets.
    #[error("content dimension \"{0}\" has no presets")]
    EmptyDimension(String),

    /// Failure reported by an external store backend.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
