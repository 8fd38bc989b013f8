//! Interfaces of the content store collaborators.
//!
//! The export engine only ever reads through these traits. [`MemoryStore`]
//! implements all of them over a snapshot; other backends can implement them
//! over a live database.
//!
//! [`MemoryStore`]: crate::MemoryStore

use nodex_common::{Dimensions, NodeVariantRecord};
use serde::{Deserialize, Serialize};

use crate::{ContentContext, NodeTypeFilter, PropertyExport, ReadPrivilege, Result};

/// A site: the top-level node below `/sites` plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub node_name: String,
    pub name: String,
    pub site_resources_package_key: String,
}

/// Parameters of a child node lookup.
#[derive(Debug, Clone)]
pub struct ChildQuery<'a> {
    pub parent_path: &'a str,
    pub node_type_filter: Option<&'a NodeTypeFilter>,
    pub workspace: &'a str,
    pub dimensions: &'a Dimensions,
    pub include_removed: bool,
    /// Return all descendants instead of direct children only.
    pub recursive: bool,
    pub privilege: &'a ReadPrivilege,
}

/// Read access to node records.
pub trait NodeStoreReader {
    /// Resolve the node at `path` in the context's workspace and dimensions.
    fn get_node(&self, path: &str, context: &ContentContext) -> Result<Option<NodeVariantRecord>>;

    /// Resolve a node by identifier in the context's workspace and dimensions.
    fn get_node_by_identifier(
        &self,
        identifier: &str,
        context: &ContentContext,
    ) -> Result<Option<NodeVariantRecord>>;

    /// Find children (or all descendants) of a path, one variant per node.
    ///
    /// Hidden nodes are returned; visibility is the caller's concern.
    fn find_children(&self, query: &ChildQuery<'_>) -> Result<Vec<NodeVariantRecord>>;
}

/// Enumerates the legal dimension combinations of a store.
pub trait DimensionCombinator {
    fn all_allowed_combinations(&self) -> Vec<Dimensions>;
}

/// Node type metadata needed for export.
pub trait NodeTypeRegistry {
    /// Export information for one property, `None` if the type does not
    /// declare it.
    fn property_export(&self, node_type: &str, property: &str) -> Option<PropertyExport>;
}

/// Site lookup by node name.
pub trait SiteRepository {
    fn find_site(&self, node_name: &str) -> Result<Option<Site>>;
}

/// Everything an export reads from.
pub trait ContentRepository:
    NodeStoreReader + DimensionCombinator + NodeTypeRegistry + SiteRepository
{
}

impl<T> ContentRepository for T where
    T: NodeStoreReader + DimensionCombinator + NodeTypeRegistry + SiteRepository + ?Sized
{
}
