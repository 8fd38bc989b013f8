//! In-memory form of an export document.

use std::collections::BTreeMap;

use nodex_common::Dimensions;

use crate::{Error, Result};

/// A parsed export document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportDocument {
    pub site_name: String,
    pub site_package_key: String,
    pub workspace: String,
    pub source_language: String,
    pub target_language: Option<String>,
    pub modified_after: Option<String>,
    pub format_version: String,
    pub nodes: Vec<ExportedNode>,
}

impl ExportDocument {
    /// Total number of variants across all nodes.
    pub fn variant_count(&self) -> usize {
        self.nodes.iter().map(|n| n.variants.len()).sum()
    }

    /// Find a node by identifier.
    pub fn node(&self, identifier: &str) -> Option<&ExportedNode> {
        self.nodes.iter().find(|n| n.identifier == identifier)
    }

    /// The language translations are imported into.
    ///
    /// An explicit `requested` language wins over the one recorded in the
    /// document.
    pub fn resolve_target_language(&self, requested: Option<&str>) -> Result<String> {
        requested
            .or(self.target_language.as_deref())
            .map(str::to_string)
            .ok_or(Error::MissingTargetLanguage)
    }
}

/// One `<node>` element: a logical node and its exported variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedNode {
    pub identifier: String,
    pub node_name: String,
    pub variants: Vec<ExportedVariant>,
}

/// One `<variant>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportedVariant {
    pub node_type: String,
    pub dimensions: Dimensions,
    /// Property texts, CDATA sections already joined.
    pub properties: BTreeMap<String, String>,
}

impl ExportedVariant {
    /// Dimensions of the translated variant: the variant's own values with
    /// `language_dimension` replaced by `target_language`.
    pub fn target_dimensions(&self, language_dimension: &str, target_language: &str) -> Dimensions {
        self.dimensions
            .iter()
            .map(|(name, values)| {
                if name == language_dimension {
                    (name, vec![target_language.to_string()])
                } else {
                    (name, values.to_vec())
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target_language() {
        let mut document = ExportDocument::default();
        assert!(matches!(
            document.resolve_target_language(None),
            Err(Error::MissingTargetLanguage)
        ));
        assert_eq!(document.resolve_target_language(Some("fr")).unwrap(), "fr");

        document.target_language = Some("de".to_string());
        assert_eq!(document.resolve_target_language(None).unwrap(), "de");
        assert_eq!(document.resolve_target_language(Some("fr")).unwrap(), "fr");
    }

    #[test]
    fn test_target_dimensions() {
        let variant = ExportedVariant {
            node_type: "Acme:Text".to_string(),
            dimensions: Dimensions::new()
                .with("language", ["en"])
                .with("region", ["gb", "us"]),
            properties: BTreeMap::new(),
        };

        let target = variant.target_dimensions("language", "de");
        assert_eq!(target.effective("language"), Some("de"));
        assert_eq!(target.get("region").map(<[String]>::len), Some(2));
    }
}
