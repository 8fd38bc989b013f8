//! Node type filters.
//!
//! A filter is a comma-separated list of node type names. Names prefixed with
//! `!` exclude nodes of that type (and its sub types); the remaining names
//! restrict the result to nodes of at least one of those types. A filter with
//! only exclusions admits every other type.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Parsed node type filter, e.g. `!Neos.Neos:Document`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTypeFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl NodeTypeFilter {
    /// Parse a filter string.
    pub fn parse(filter: &str) -> Result<Self> {
        let mut parsed = Self::default();
        for part in filter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.strip_prefix('!') {
                Some(name) if !name.trim().is_empty() => parsed.exclude.push(name.trim().to_string()),
                Some(_) => return Err(Error::InvalidNodeTypeFilter(filter.to_string())),
                None => parsed.include.push(part.to_string()),
            }
        }
        Ok(parsed)
    }

    /// Filter admitting every type except `node_type` and its sub types.
    pub fn excluding(node_type: impl Into<String>) -> Self {
        Self {
            include: Vec::new(),
            exclude: vec![node_type.into()],
        }
    }

    /// Evaluate the filter.
    ///
    /// `is_of_type(node_type, super_type)` must answer whether `node_type` is
    /// `super_type` or inherits from it.
    pub fn matches<F>(&self, node_type: &str, is_of_type: F) -> bool
    where
        F: Fn(&str, &str) -> bool,
    {
        if self.exclude.iter().any(|t| is_of_type(node_type, t)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|t| is_of_type(node_type, t))
    }
}

impl FromStr for NodeTypeFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for NodeTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .include
            .iter()
            .cloned()
            .chain(self.exclude.iter().map(|t| format!("!{}", t)))
            .collect();
        f.write_str(&parts.join(","))
    }
}
