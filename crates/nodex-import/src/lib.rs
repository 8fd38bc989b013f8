//! Reader for nodex translation export documents.
//!
//! The exporter writes a subtree as `<content>`/`<nodes>`/`<node>`/`<variant>`
//! elements; this crate reads such a document back into an
//! [`ExportDocument`] so translated variants can be merged into a store.
//!
//! ```no_run
//! let document = nodex_import::read_file("acme-de.xml")?;
//! let target = document.resolve_target_language(None)?;
//!
//! for node in &document.nodes {
//!     for variant in &node.variants {
//!         let dimensions = variant.target_dimensions("language", &target);
//!         println!("{} -> {}", node.identifier, dimensions);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod document;
mod error;
mod parser;

pub use document::{ExportDocument, ExportedNode, ExportedVariant};
pub use error::{Error, Result};
pub use parser::{parse, read_file, SUPPORTED_FORMAT_VERSION};
