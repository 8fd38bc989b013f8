//! Nodex - translation export for multi-dimensional content trees.
//!
//! This crate provides a unified interface to the nodex crates.
//!
//! # Crates
//!
//! - [`nodex_common`] - Records, dimensions and content paths
//! - [`nodex_store`] - Content store interfaces and the in-memory snapshot store
//! - [`nodex_export`] - Selection and XML serialization of content subtrees
//! - [`nodex_import`] - Reader for exported documents
//!
//! # Example
//!
//! ```no_run
//! use nodex::prelude::*;
//!
//! let store = MemoryStore::open("acme.snapshot.json")?;
//! let request = ExportRequest::new("acme/about", "en").target_language("de");
//! let xml = ExportService::new(&store).export_to_string(&request)?;
//!
//! // Read it back
//! let document = nodex::import::parse(&xml)?;
//! println!("Nodes: {}", document.nodes.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use nodex_common as common;
pub use nodex_export as export;
pub use nodex_import as import;
pub use nodex_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use nodex_common::{Dimensions, NodeVariantRecord, PropertyValue};
    pub use nodex_export::{ExportRequest, ExportService, ExportSettings, ExportSummary};
    pub use nodex_import::{ExportDocument, ExportedNode, ExportedVariant};
    pub use nodex_store::{ContentContext, ContentRepository, MemoryStore, Snapshot};
}

// Re-export commonly used types at the crate root
pub use nodex_export::ExportService;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
