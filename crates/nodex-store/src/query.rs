//! Query helpers for the in-memory store.
//!
//! Variant resolution lives here: a dimension combination carries a fallback
//! chain per dimension, and among all variants of a node the one whose
//! effective values sit earliest in those chains wins.

use nodex_common::{path, Dimensions, NodeVariantRecord};

use crate::memory::{MemoryStore, WorkspaceIndex};

impl MemoryStore {
    /// Total number of records across all workspaces.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of declared sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Pick the variant best matching `dimensions` from candidate indices.
    ///
    /// Removed records only compete when `include_removed` is set. Ties keep
    /// the earliest candidate.
    pub(crate) fn best_variant(
        &self,
        candidates: &[usize],
        dimensions: &Dimensions,
        include_removed: bool,
    ) -> Option<&NodeVariantRecord> {
        candidates
            .iter()
            .map(|&idx| &self.records[idx])
            .filter(|r| include_removed || !r.removed)
            .filter_map(|r| dimensions.fallback_rank(&r.dimension_values).map(|rank| (rank, r)))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, r)| r)
    }

    /// Indices of all records below `parent`, direct children only unless
    /// `recursive` is set.
    pub(crate) fn descendant_indices(
        &self,
        workspace: &WorkspaceIndex,
        parent: &str,
        recursive: bool,
    ) -> Vec<usize> {
        if !recursive {
            return workspace.children.get(parent).cloned().unwrap_or_default();
        }

        let mut indices: Vec<usize> = workspace
            .by_path
            .iter()
            .filter(|(p, _)| path::is_descendant_of(p, parent))
            .flat_map(|(_, idx)| idx.iter().copied())
            .collect();
        indices.sort_unstable();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Snapshot;

    fn store() -> MemoryStore {
        let snapshot = Snapshot::new()
            .node(
                NodeVariantRecord::new("a", "/sites/acme/about", "Acme:Page")
                    .with_dimension("language", ["en"]),
            )
            .node(
                NodeVariantRecord::new("a", "/sites/acme/about", "Acme:Page")
                    .with_dimension("language", ["de"]),
            )
            .node({
                let mut removed = NodeVariantRecord::new("b", "/sites/acme/old", "Acme:Page")
                    .with_dimension("language", ["en"]);
                removed.removed = true;
                removed
            })
            .node(
                NodeVariantRecord::new("x", "/sites/acme/draft", "Acme:Page")
                    .with_dimension("language", ["en"])
                    .in_workspace("review"),
            );
        MemoryStore::from_snapshot(snapshot).unwrap()
    }

    #[test]
    fn test_best_variant_follows_chain() {
        let store = store();
        let candidates = [0, 1];

        let chain = Dimensions::new().with("language", ["de", "en"]);
        let best = store.best_variant(&candidates, &chain, false).unwrap();
        assert_eq!(best.dimension("language"), Some("de"));

        let chain = Dimensions::new().with("language", ["en", "de"]);
        let best = store.best_variant(&candidates, &chain, false).unwrap();
        assert_eq!(best.dimension("language"), Some("en"));

        let chain = Dimensions::new().with("language", ["fr"]);
        assert!(store.best_variant(&candidates, &chain, false).is_none());
    }

    #[test]
    fn test_removed_records_excluded_by_default() {
        let store = store();
        let chain = Dimensions::new().with("language", ["en"]);
        assert!(store.best_variant(&[2], &chain, false).is_none());
        assert!(store.best_variant(&[2], &chain, true).is_some());
    }

    #[test]
    fn test_store_stats() {
        let store = store();
        assert_eq!(store.record_count(), 4);
        assert_eq!(store.site_count(), 0);
    }
}
