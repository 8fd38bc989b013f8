//! Export settings.
//!
//! Settings are read from a TOML file; every key is optional:
//!
//! ```toml
//! language_dimension = "language"
//! document_node_type = "Neos.Neos:Document"
//! workspace = "live"
//! indent = 2
//! ```

use std::path::Path;

use nodex_common::LIVE_WORKSPACE;
use serde::Deserialize;

use crate::Result;

/// Default name of the language dimension.
pub const DEFAULT_LANGUAGE_DIMENSION: &str = "language";

/// Default super type of page-like nodes.
pub const DEFAULT_DOCUMENT_NODE_TYPE: &str = "Neos.Neos:Document";

/// Store-specific knobs of the export engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Dimension whose effective value is a record's language.
    pub language_dimension: String,
    /// Node type all document (page-like) node types inherit from.
    pub document_node_type: String,
    /// Workspace exported when a request names none.
    pub workspace: String,
    /// Spaces per indentation level in the XML output.
    pub indent: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            language_dimension: DEFAULT_LANGUAGE_DIMENSION.to_string(),
            document_node_type: DEFAULT_DOCUMENT_NODE_TYPE.to_string(),
            workspace: LIVE_WORKSPACE.to_string(),
            indent: 2,
        }
    }
}

impl ExportSettings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = ExportSettings::from_toml_str("language_dimension = \"locale\"").unwrap();
        assert_eq!(settings.language_dimension, "locale");
        assert_eq!(settings.document_node_type, DEFAULT_DOCUMENT_NODE_TYPE);
        assert_eq!(settings.workspace, "live");
        assert_eq!(settings.indent, 2);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(ExportSettings::from_toml_str("indent = \"wide\"").is_err());
    }
}
