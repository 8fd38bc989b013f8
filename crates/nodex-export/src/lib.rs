//! Translation export for multi-dimensional content trees.
//!
//! An export takes a subtree of the content store, picks the node variants
//! that exist in a source language, and writes them as an XML document in
//! which all variants of one logical node share a single `<node>` element.
//!
//! # Quick Start
//!
//! ```no_run
//! use nodex_export::{ExportRequest, ExportService};
//! use nodex_store::MemoryStore;
//!
//! let store = MemoryStore::open("acme.snapshot.json")?;
//! let service = ExportService::new(&store);
//!
//! let request = ExportRequest::new("acme/about", "en").target_language("de");
//! let xml = service.export_to_string(&request)?;
//! println!("{xml}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Architecture
//!
//! - **Selection** ([`SelectionEngine`]): collects, deduplicates, filters and
//!   orders the records of an export
//! - **Walker** ([`ContentWalker`]): pre-order walk that does not descend into
//!   child documents
//! - **Serializer** ([`XmlExporter`]): streaming writer grouping variants per
//!   node
//! - **Service** ([`ExportService`]): string and file entry points
//!
//! # File Output
//!
//! ```no_run
//! use nodex_export::{ExportRequest, ExportService, ExportSettings};
//! use nodex_store::MemoryStore;
//!
//! let store = MemoryStore::open("acme.snapshot.json")?;
//! let settings = ExportSettings::load("nodex.toml")?;
//! let service = ExportService::with_settings(&store, settings);
//!
//! let request = ExportRequest::new("acme", "en").exclude_child_documents(true);
//! let summary = service.export_to_file("acme-en.xml", &request)?;
//! println!("{} nodes, {} variants", summary.nodes, summary.variants);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod properties;
mod request;
mod selection;
mod service;
mod settings;
mod walker;

pub mod xml;

pub use error::{Error, Result};
pub use properties::PropertySelector;
pub use request::ExportRequest;
pub use selection::{SelectionEngine, SelectionResult};
pub use service::{ExportService, ExportSummary};
pub use settings::{ExportSettings, DEFAULT_DOCUMENT_NODE_TYPE, DEFAULT_LANGUAGE_DIMENSION};
pub use walker::ContentWalker;
pub use xml::{Envelope, XmlExporter, FORMAT_VERSION};
