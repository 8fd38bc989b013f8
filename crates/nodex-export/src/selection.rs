//! Selection of the node variant records that make up an export.
//!
//! Selection runs in several passes over the candidate list:
//!
//! 1. keep the dimension combinations whose language is the source language,
//! 2. collect the starting node and its descendants in each of them,
//! 3. deduplicate variants per identifier, preferring the source language,
//! 4. drop records that resolve in no source combination, or below a hidden
//!    ancestor in any combination where they resolve,
//! 5. sort by normalized path.

use std::collections::BTreeMap;

use nodex_common::{path, Dimensions, NodeVariantRecord};
use nodex_store::{
    ChildQuery, ContentContext, ContentRepository, DimensionCombinator, NodeStoreReader, ReadPrivilege,
};
use tracing::debug;

use crate::properties::FxHashMap;
use crate::walker::ContentWalker;
use crate::{Error, ExportRequest, ExportSettings, Result};

/// Ordered records of one export.
///
/// Variants of one identifier are contiguous; no two records share both
/// identifier and effective dimension values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionResult {
    records: Vec<NodeVariantRecord>,
}

impl SelectionResult {
    /// Number of records (variants).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeVariantRecord> {
        self.records.iter()
    }

    /// Number of distinct logical nodes.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut previous: Option<&str> = None;
        for record in &self.records {
            if previous != Some(record.identifier.as_str()) {
                count += 1;
                previous = Some(&record.identifier);
            }
        }
        count
    }

    pub fn into_records(self) -> Vec<NodeVariantRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a SelectionResult {
    type Item = &'a NodeVariantRecord;
    type IntoIter = std::slice::Iter<'a, NodeVariantRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Computes the [`SelectionResult`] of an [`ExportRequest`].
pub struct SelectionEngine<'a, R: ContentRepository + ?Sized> {
    repository: &'a R,
    settings: &'a ExportSettings,
}

impl<'a, R: ContentRepository + ?Sized> SelectionEngine<'a, R> {
    pub fn new(repository: &'a R, settings: &'a ExportSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// The context every store read of `request` starts from.
    ///
    /// Reads run with elevated privilege; hidden and inaccessible content is
    /// only shown when the request does not ignore hidden content.
    pub fn base_context(&self, request: &ExportRequest) -> ContentContext {
        let workspace = request
            .workspace
            .clone()
            .unwrap_or_else(|| self.settings.workspace.clone());
        ContentContext::new(workspace, Dimensions::new())
            .show_invisible(!request.ignore_hidden)
            .show_inaccessible(!request.ignore_hidden)
            .with_privilege(ReadPrivilege::Elevated)
    }

    /// All allowed combinations whose language is `language`.
    pub fn source_combinations(&self, language: &str) -> Result<Vec<Dimensions>> {
        let dimension = self.settings.language_dimension.as_str();
        let combinations: Vec<Dimensions> = self
            .repository
            .all_allowed_combinations()
            .into_iter()
            .filter(|c| c.effective(dimension) == Some(language))
            .collect();

        if combinations.is_empty() {
            return Err(Error::UnknownSourceLanguage {
                dimension: dimension.to_string(),
                language: language.to_string(),
            });
        }
        Ok(combinations)
    }

    /// Resolve a logical node in one source context.
    pub fn resolve_in_language(
        &self,
        identifier: &str,
        context: &ContentContext,
    ) -> Result<Option<NodeVariantRecord>> {
        Ok(self.repository.get_node_by_identifier(identifier, context)?)
    }

    /// Run the full selection for `request`.
    pub fn select(&self, request: &ExportRequest) -> Result<SelectionResult> {
        let start_path = path::site_path(&request.starting_point);
        path::validate(&start_path)?;

        let base = self.base_context(request);
        let contexts: Vec<ContentContext> = self
            .source_combinations(&request.source_language)?
            .into_iter()
            .map(|combination| base.for_dimensions(combination))
            .collect();

        let candidates = self.collect(&start_path, &contexts, request.exclude_child_documents)?;
        let Some(candidates) = candidates else {
            return Err(Error::NodeNotFound(start_path));
        };
        debug!(count = candidates.len(), "collected candidate records");

        let deduplicated = self.deduplicate(candidates, &request.source_language);
        debug!(count = deduplicated.len(), "deduplicated records");

        let mut visible = Vec::with_capacity(deduplicated.len());
        for record in deduplicated {
            if self.resolves_visibly(&record, &contexts, &request.source_language, request.ignore_hidden)? {
                visible.push(record);
            } else {
                debug!(
                    identifier = %record.identifier,
                    path = %record.path,
                    "dropping record that is hidden or resolves in no source context"
                );
            }
        }

        let records = sort_records(visible);
        debug!(count = records.len(), "selected records");
        Ok(SelectionResult { records })
    }

    /// Starting node plus descendants in every context, or `None` when the
    /// starting node resolves in none of them.
    fn collect(
        &self,
        start_path: &str,
        contexts: &[ContentContext],
        exclude_child_documents: bool,
    ) -> Result<Option<Vec<NodeVariantRecord>>> {
        let mut found = false;
        let mut records = Vec::new();

        for context in contexts {
            let Some(root) = self.repository.get_node(start_path, context)? else {
                debug!(dimensions = %context.dimensions, "starting node not found in combination");
                continue;
            };
            found = true;

            if exclude_child_documents {
                let walker = ContentWalker::new(self.repository, &self.settings.document_node_type);
                records.extend(walker.walk(root, context)?);
            } else {
                let query = ChildQuery {
                    parent_path: start_path,
                    node_type_filter: None,
                    workspace: &context.workspace,
                    dimensions: &context.dimensions,
                    include_removed: context.removed_content_shown,
                    recursive: true,
                    privilege: &context.privilege,
                };
                records.push(root);
                records.extend(self.repository.find_children(&query)?);
            }
        }

        Ok(found.then_some(records))
    }

    /// One entry per identifier and effective dimension values.
    ///
    /// When any variant of a node is in the source language, all its source
    /// variants are kept; otherwise the variant with the smallest dimension
    /// signature stands in for the node.
    fn deduplicate(&self, records: Vec<NodeVariantRecord>, source_language: &str) -> Vec<NodeVariantRecord> {
        let dimension = self.settings.language_dimension.as_str();

        let mut order: Vec<String> = Vec::new();
        let mut groups: FxHashMap<String, BTreeMap<String, NodeVariantRecord>> = FxHashMap::default();
        for record in records {
            let group = groups.entry_ref(record.identifier.as_str()).or_default();
            if group.is_empty() {
                order.push(record.identifier.clone());
            }
            group
                .entry(record.dimension_values.effective_signature())
                .or_insert(record);
        }

        let mut result = Vec::new();
        for identifier in order {
            let Some(variants) = groups.remove(&identifier) else {
                continue;
            };
            let has_source = variants.values().any(|r| r.is_in(dimension, source_language));
            if has_source {
                result.extend(variants.into_values().filter(|r| r.is_in(dimension, source_language)));
            } else if let Some((_, record)) = variants.into_iter().next() {
                result.push(record);
            }
        }
        result
    }

    /// Whether a record resolves in some source context and sits below no
    /// hidden ancestor in any context where it resolves.
    ///
    /// A source-language record only counts as resolving where the lookup
    /// yields that very variant; other records are checked as re-resolved.
    fn resolves_visibly(
        &self,
        record: &NodeVariantRecord,
        contexts: &[ContentContext],
        source_language: &str,
        ignore_hidden: bool,
    ) -> Result<bool> {
        let in_source = record.is_in(&self.settings.language_dimension, source_language);
        let signature = record.dimension_values.effective_signature();

        let mut resolved_anywhere = false;
        for context in contexts {
            let lookup = context.clone().show_invisible(true);
            let Some(resolved) = self.resolve_in_language(&record.identifier, &lookup)? else {
                continue;
            };
            let checked = if in_source {
                if resolved.dimension_values.effective_signature() != signature {
                    continue;
                }
                record
            } else {
                &resolved
            };

            if ignore_hidden && self.has_hidden_ancestor(checked, &lookup)? {
                return Ok(false);
            }
            resolved_anywhere = true;
        }
        Ok(resolved_anywhere)
    }

    /// Walk up from `record` in `context`, which must show hidden content.
    ///
    /// The walk ends at the first ancestor that does not resolve or carries
    /// no dimension values; such an ancestor is not checked.
    fn has_hidden_ancestor(&self, record: &NodeVariantRecord, context: &ContentContext) -> Result<bool> {
        if record.hidden {
            return Ok(true);
        }

        let mut current = record.parent_path().map(str::to_string);
        while let Some(parent) = current {
            let Some(ancestor) = self.repository.get_node(&parent, context)? else {
                break;
            };
            if ancestor.dimension_values.is_empty() {
                break;
            }
            if ancestor.hidden {
                return Ok(true);
            }
            current = ancestor.parent_path().map(str::to_string);
        }
        Ok(false)
    }
}

/// Order records by normalized path, keeping the variants of one identifier
/// together at the position of their smallest path.
fn sort_records(records: Vec<NodeVariantRecord>) -> Vec<NodeVariantRecord> {
    let mut group_keys: FxHashMap<&str, String> = FxHashMap::default();
    for record in &records {
        let key = path::sort_key(&record.path);
        group_keys
            .entry(record.identifier.as_str())
            .and_modify(|k| {
                if key < *k {
                    *k = key.clone();
                }
            })
            .or_insert(key);
    }

    let mut keyed: Vec<(String, String, String, &NodeVariantRecord)> = records
        .iter()
        .map(|r| {
            (
                group_keys[r.identifier.as_str()].clone(),
                path::sort_key(&r.path),
                r.dimension_values.effective_signature(),
                r,
            )
        })
        .collect();
    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.3.identifier.cmp(&b.3.identifier))
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    keyed.into_iter().map(|(_, _, _, r)| r.clone()).collect()
}
