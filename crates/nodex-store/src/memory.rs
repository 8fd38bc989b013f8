//! In-memory content store backed by a JSON snapshot.
//!
//! The snapshot holds sites, node type definitions, dimension presets and the
//! denormalized node records (one record per node and dimension combination):
//!
//! ```json
//! {
//!   "sites": [{ "nodeName": "acme", "name": "Acme Inc.", "siteResourcesPackageKey": "Acme.Site" }],
//!   "nodeTypes": { "Acme:Page": { "superTypes": ["Neos.Neos:Document"], "properties": { "title": { "type": "string" } } } },
//!   "dimensions": { "language": { "presets": { "en": { "values": ["en"] } } } },
//!   "nodes": [{ "identifier": "a1", "path": "/sites/acme", "nodeType": "Acme:Page", "dimensionValues": { "language": ["en"] } }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use hashbrown::{HashMap as FastHashMap, HashSet as FastHashSet};
use memmap2::Mmap;
use nodex_common::{path, NodeVariantRecord};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dimensions::{ContentDimension, PresetCombinator};
use crate::node_type::{NodeTypeDefinition, NodeTypeManager};
use crate::repository::{
    ChildQuery, DimensionCombinator, NodeStoreReader, NodeTypeRegistry, Site, SiteRepository,
};
use crate::{ContentContext, Error, PropertyExport, Result};

pub(crate) type FxHashMap<K, V> = FastHashMap<K, V, std::hash::BuildHasherDefault<FxHasher>>;
pub(crate) type FxHashSet<T> = FastHashSet<T, std::hash::BuildHasherDefault<FxHasher>>;

/// Serialized form of a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub sites: Vec<Site>,
    #[serde(default)]
    pub node_types: BTreeMap<String, NodeTypeDefinition>,
    #[serde(default)]
    pub dimensions: BTreeMap<String, ContentDimension>,
    #[serde(default)]
    pub nodes: Vec<NodeVariantRecord>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style site declaration.
    pub fn site(
        mut self,
        node_name: impl Into<String>,
        name: impl Into<String>,
        package_key: impl Into<String>,
    ) -> Self {
        self.sites.push(Site {
            node_name: node_name.into(),
            name: name.into(),
            site_resources_package_key: package_key.into(),
        });
        self
    }

    /// Builder-style node type declaration.
    pub fn node_type(mut self, name: impl Into<String>, definition: NodeTypeDefinition) -> Self {
        self.node_types.insert(name.into(), definition);
        self
    }

    /// Builder-style dimension declaration.
    pub fn dimension(mut self, name: impl Into<String>, dimension: ContentDimension) -> Self {
        self.dimensions.insert(name.into(), dimension);
        self
    }

    /// Builder-style record insertion.
    pub fn node(mut self, record: NodeVariantRecord) -> Self {
        self.nodes.push(record);
        self
    }
}

/// Lookup tables of one workspace, holding indices into the record list.
#[derive(Debug, Default)]
pub(crate) struct WorkspaceIndex {
    pub(crate) by_path: FxHashMap<String, Vec<usize>>,
    pub(crate) by_identifier: FxHashMap<String, Vec<usize>>,
    pub(crate) children: FxHashMap<String, Vec<usize>>,
}

/// Content store holding every record in memory.
pub struct MemoryStore {
    pub(crate) sites: FxHashMap<String, Site>,
    pub(crate) node_types: NodeTypeManager,
    pub(crate) combinator: PresetCombinator,
    pub(crate) records: Vec<NodeVariantRecord>,
    pub(crate) workspaces: FxHashMap<String, WorkspaceIndex>,
}

impl MemoryStore {
    /// Open a snapshot file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        // SAFETY: the map is only read while parsing and dropped before return;
        // the snapshot file is not expected to change underneath us.
        let mmap = unsafe { Mmap::map(&file)? };
        let store = Self::parse(&mmap)?;
        debug!(
            path = %path.as_ref().display(),
            records = store.records.len(),
            "loaded store snapshot"
        );
        Ok(store)
    }

    /// Parse a snapshot from JSON bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_slice(data)?;
        Self::from_snapshot(snapshot)
    }

    /// Build the store and its indexes from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let combinator = PresetCombinator::new(snapshot.dimensions)?;
        let node_types = NodeTypeManager::new(snapshot.node_types);

        let sites = snapshot
            .sites
            .into_iter()
            .map(|s| (s.node_name.clone(), s))
            .collect();

        let mut workspaces: FxHashMap<String, WorkspaceIndex> = FxHashMap::default();
        let mut variants: FxHashSet<(&str, &str, String)> = FxHashSet::default();

        for (idx, record) in snapshot.nodes.iter().enumerate() {
            path::validate(&record.path)?;

            let variant = (
                record.workspace.as_str(),
                record.identifier.as_str(),
                record.dimension_values.effective_signature(),
            );
            if !variants.insert(variant) {
                return Err(Error::DuplicateVariant {
                    identifier: record.identifier.clone(),
                    workspace: record.workspace.clone(),
                    dimensions: record.dimension_values.to_string(),
                });
            }

            let index = workspaces.entry(record.workspace.clone()).or_default();
            index
                .by_path
                .entry(record.path.clone())
                .or_default()
                .push(idx);
            index
                .by_identifier
                .entry(record.identifier.clone())
                .or_default()
                .push(idx);
            if let Some(parent) = record.parent_path() {
                index
                    .children
                    .entry(parent.to_string())
                    .or_default()
                    .push(idx);
            }
        }
        drop(variants);

        Ok(Self {
            sites,
            node_types,
            combinator,
            records: snapshot.nodes,
            workspaces,
        })
    }
}

impl NodeStoreReader for MemoryStore {
    fn get_node(&self, path: &str, context: &ContentContext) -> Result<Option<NodeVariantRecord>> {
        let Some(candidates) = self
            .workspaces
            .get(&context.workspace)
            .and_then(|ws| ws.by_path.get(path))
        else {
            return Ok(None);
        };

        Ok(self
            .best_variant(candidates, &context.dimensions, context.removed_content_shown)
            .filter(|r| context.admits(r))
            .cloned())
    }

    fn get_node_by_identifier(
        &self,
        identifier: &str,
        context: &ContentContext,
    ) -> Result<Option<NodeVariantRecord>> {
        let Some(candidates) = self
            .workspaces
            .get(&context.workspace)
            .and_then(|ws| ws.by_identifier.get(identifier))
        else {
            return Ok(None);
        };

        Ok(self
            .best_variant(candidates, &context.dimensions, context.removed_content_shown)
            .filter(|r| context.admits(r))
            .cloned())
    }

    fn find_children(&self, query: &ChildQuery<'_>) -> Result<Vec<NodeVariantRecord>> {
        let Some(workspace) = self.workspaces.get(query.workspace) else {
            return Ok(Vec::new());
        };

        let candidates = self.descendant_indices(workspace, query.parent_path, query.recursive);

        // Group candidate variants per logical node, keeping first-seen order.
        let mut order: Vec<&str> = Vec::new();
        let mut groups: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for idx in candidates {
            let identifier = self.records[idx].identifier.as_str();
            let group = groups.entry(identifier).or_default();
            if group.is_empty() {
                order.push(identifier);
            }
            group.push(idx);
        }

        let mut result: Vec<NodeVariantRecord> = order
            .into_iter()
            .filter_map(|identifier| {
                self.best_variant(&groups[identifier], query.dimensions, query.include_removed)
            })
            .filter(|r| {
                query.node_type_filter.map_or(true, |filter| {
                    filter.matches(&r.node_type, |t, s| self.node_types.is_of_type(t, s))
                })
            })
            .filter(|r| query.privilege.can_read(r))
            .cloned()
            .collect();

        result.sort_by(|a, b| {
            path::compare(&a.path, &b.path).then_with(|| a.identifier.cmp(&b.identifier))
        });

        Ok(result)
    }
}

impl DimensionCombinator for MemoryStore {
    fn all_allowed_combinations(&self) -> Vec<nodex_common::Dimensions> {
        self.combinator.combinations()
    }
}

impl NodeTypeRegistry for MemoryStore {
    fn property_export(&self, node_type: &str, property: &str) -> Option<PropertyExport> {
        self.node_types.property_export(node_type, property)
    }
}

impl SiteRepository for MemoryStore {
    fn find_site(&self, node_name: &str) -> Result<Option<Site>> {
        Ok(self.sites.get(node_name).cloned())
    }
}
