//! Read-side content store access for nodex.
//!
//! The export engine talks to the content store exclusively through the
//! traits in [`repository`]: node lookups by path or identifier, child
//! queries, dimension combinations, node type metadata and site lookup.
//! Every read carries a [`ContentContext`] naming the workspace, the
//! dimension combination and the visibility rules (including the
//! [`ReadPrivilege`]) to apply.
//!
//! [`MemoryStore`] implements all collaborator traits over a JSON
//! [`Snapshot`], which is what the CLI and the tests use.
//!
//! # Example
//!
//! ```no_run
//! use nodex_common::Dimensions;
//! use nodex_store::{ContentContext, MemoryStore, NodeStoreReader};
//!
//! let store = MemoryStore::open("acme.snapshot.json")?;
//! let context = ContentContext::new("live", Dimensions::new().with("language", ["de", "en"]));
//!
//! if let Some(node) = store.get_node("/sites/acme/about", &context)? {
//!     println!("{} ({})", node.identifier, node.node_type);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod context;
mod error;
mod filter;
mod memory;
mod query;

pub mod dimensions;
pub mod node_type;
pub mod repository;

pub use context::{ContentContext, ReadPrivilege};
pub use dimensions::{ContentDimension, PresetCombinator};
pub use error::{Error, Result};
pub use filter::NodeTypeFilter;
pub use memory::{MemoryStore, Snapshot};
pub use node_type::{NodeTypeDefinition, NodeTypeManager, PropertyExport};
pub use repository::{
    ChildQuery, ContentRepository, DimensionCombinator, NodeStoreReader, NodeTypeRegistry, Site,
    SiteRepository,
};
