//! Node type definitions and their resolution.
//!
//! Node types form an inheritance graph through `superTypes`. Properties and
//! per-property export options are inherited; a sub type overrides what it
//! redeclares.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::memory::FxHashSet;

/// Declared type name of translatable text properties.
pub const STRING_TYPE: &str = "string";

/// Declaration of one property on a node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Export options of one property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyExportOptions {
    #[serde(default)]
    pub skip: bool,
}

/// A node type as declared in the registry, before inheritance is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDefinition {
    #[serde(default)]
    pub super_types: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
    #[serde(default)]
    pub export_options: BTreeMap<String, PropertyExportOptions>,
}

impl NodeTypeDefinition {
    /// Builder-style super type declaration.
    pub fn extends(mut self, super_type: impl Into<String>) -> Self {
        self.super_types.push(super_type.into());
        self
    }

    /// Builder-style property declaration.
    pub fn property(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.properties.insert(
            name.into(),
            PropertyDefinition {
                type_name: type_name.into(),
            },
        );
        self
    }

    /// Builder-style export skip marker.
    pub fn skip_export(mut self, name: impl Into<String>) -> Self {
        self.export_options
            .insert(name.into(), PropertyExportOptions { skip: true });
        self
    }
}

/// What the registry knows about exporting one property of one node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyExport {
    pub type_name: String,
    pub skip: bool,
}

impl PropertyExport {
    /// Only declared, non-skipped string properties are translatable content.
    pub fn is_exportable(&self) -> bool {
        !self.skip && self.type_name == STRING_TYPE
    }
}

/// Registry of node type definitions with inheritance resolution.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeManager {
    definitions: BTreeMap<String, NodeTypeDefinition>,
}

impl NodeTypeManager {
    /// Create a manager from declared definitions.
    pub fn new(definitions: BTreeMap<String, NodeTypeDefinition>) -> Self {
        Self { definitions }
    }

    /// Whether `node_type` is `super_type` or inherits from it.
    pub fn is_of_type(&self, node_type: &str, super_type: &str) -> bool {
        self.lineage(node_type).iter().any(|t| *t == super_type)
    }

    /// Resolve export information for one property, walking super types.
    ///
    /// Returns `None` when no type in the lineage declares the property.
    pub fn property_export(&self, node_type: &str, property: &str) -> Option<PropertyExport> {
        let lineage = self.lineage(node_type);

        let type_name = lineage.iter().find_map(|t| {
            self.definitions
                .get(*t)?
                .properties
                .get(property)
                .map(|p| p.type_name.clone())
        })?;

        let skip = lineage
            .iter()
            .find_map(|t| self.definitions.get(*t)?.export_options.get(property))
            .map(|o| o.skip)
            .unwrap_or(false);

        Some(PropertyExport { type_name, skip })
    }

    /// The node type followed by all of its super types, nearest first.
    ///
    /// Cycles in the declared graph are cut at the first repeated type.
    fn lineage<'a>(&'a self, node_type: &'a str) -> Vec<&'a str> {
        let mut lineage = Vec::new();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut pending = vec![node_type];

        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            lineage.push(current);
            if let Some(definition) = self.definitions.get(current) {
                // Reverse so the first declared super type is visited first.
                pending.extend(definition.super_types.iter().rev().map(String::as_str));
            }
        }

        lineage
    }
}
