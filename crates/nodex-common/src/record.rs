//! Node variant records.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::{path, Dimensions};

/// Workspace records belong to when none is given.
pub const LIVE_WORKSPACE: &str = "live";

#[cfg(feature = "serde")]
fn live_workspace() -> String {
    LIVE_WORKSPACE.to_string()
}

/// A node property value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Get as string slice, only for string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar text of the value.
    ///
    /// `Null` yields an empty string; lists and maps have no text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => Some(Cow::Borrowed("")),
            Self::Bool(b) => Some(Cow::Owned(b.to_string())),
            Self::Number(n) => Some(Cow::Owned(n.to_string())),
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::List(items) => write!(f, "[{} items]", items.len()),
            Self::Map(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

/// One node's data in one dimension combination.
///
/// Several records may share an `identifier`; each of them is a variant of the
/// same logical node. Within one workspace and dimension combination the
/// identifier is unique.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NodeVariantRecord {
    pub identifier: String,
    pub path: String,
    pub node_type: String,
    #[cfg_attr(feature = "serde", serde(default = "live_workspace"))]
    pub workspace: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub dimension_values: Dimensions,
    #[cfg_attr(feature = "serde", serde(default))]
    pub properties: BTreeMap<String, PropertyValue>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hidden: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub removed: bool,
    /// Roles allowed to read the node; empty means unrestricted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub access_roles: Vec<String>,
}

impl NodeVariantRecord {
    /// Create a visible record in the live workspace with no dimensions.
    pub fn new(
        identifier: impl Into<String>,
        path: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            path: path.into(),
            node_type: node_type.into(),
            workspace: LIVE_WORKSPACE.to_string(),
            dimension_values: Dimensions::new(),
            properties: BTreeMap::new(),
            hidden: false,
            removed: false,
            access_roles: Vec::new(),
        }
    }

    /// Builder-style dimension setter.
    pub fn with_dimension<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimension_values.insert(name, values);
        self
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Builder-style workspace setter.
    pub fn in_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = workspace.into();
        self
    }

    /// Builder-style hidden flag.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Final path segment.
    pub fn name(&self) -> &str {
        path::node_name(&self.path)
    }

    /// Path of the containing node.
    pub fn parent_path(&self) -> Option<&str> {
        path::parent_path(&self.path)
    }

    /// Effective value of a dimension.
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimension_values.effective(name)
    }

    /// Whether the record's effective value for `dimension` is `value`.
    pub fn is_in(&self, dimension: &str, value: &str) -> bool {
        self.dimension(dimension) == Some(value)
    }
}
