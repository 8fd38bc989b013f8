//! Exportable property selection with per-node-type caching.

use std::borrow::Cow;

use hashbrown::HashMap as FastHashMap;
use nodex_common::NodeVariantRecord;
use nodex_store::NodeTypeRegistry;
use rustc_hash::FxHasher;
use tracing::trace;

pub(crate) type FxHashMap<K, V> = FastHashMap<K, V, std::hash::BuildHasherDefault<FxHasher>>;

/// Decides which properties of a record are written, asking the registry at
/// most once per node type and property name.
pub struct PropertySelector<'a, T: NodeTypeRegistry + ?Sized> {
    registry: &'a T,
    cache: FxHashMap<String, FxHashMap<String, bool>>,
}

impl<'a, T: NodeTypeRegistry + ?Sized> PropertySelector<'a, T> {
    pub fn new(registry: &'a T) -> Self {
        Self {
            registry,
            cache: FxHashMap::default(),
        }
    }

    /// Whether a property of a node type is declared, not skipped, and of
    /// type `string`.
    pub fn is_exportable(&mut self, node_type: &str, property: &str) -> bool {
        let registry = self.registry;
        let per_type = self.cache.entry_ref(node_type).or_default();
        if let Some(&exportable) = per_type.get(property) {
            return exportable;
        }

        let exportable = registry
            .property_export(node_type, property)
            .is_some_and(|p| p.is_exportable());
        per_type.insert(property.to_string(), exportable);
        exportable
    }

    /// Exportable properties of a record with their text, in name order.
    ///
    /// Values without a scalar text form are left out.
    pub fn select<'r>(&mut self, record: &'r NodeVariantRecord) -> Vec<(&'r str, Cow<'r, str>)> {
        let mut selected = Vec::new();
        for (name, value) in &record.properties {
            if !self.is_exportable(&record.node_type, name) {
                continue;
            }
            match value.as_text() {
                Some(text) => selected.push((name.as_str(), text)),
                None => trace!(
                    identifier = %record.identifier,
                    property = %name,
                    "skipping non-scalar string property"
                ),
            }
        }
        selected
    }

    /// Number of node types resolved so far.
    pub fn cached_node_types(&self) -> usize {
        self.cache.len()
    }
}
