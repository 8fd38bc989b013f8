//! Content dimensions.

use std::collections::BTreeMap;
use std::fmt;

/// Mapping from dimension name to an ordered list of dimension values.
///
/// On a record the first value of each list is the *effective* value. On a
/// dimension combination the list is a fallback chain: the first value is
/// preferred, later values are used when no record exists for earlier ones.
///
/// Keys are kept sorted so that iteration order is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Dimensions(BTreeMap<String, Vec<String>>);

impl Dimensions {
    /// Create an empty dimension mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, values);
        self
    }

    /// Set the value list of a dimension.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Value list of a dimension.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// First value of a dimension.
    pub fn effective(&self, name: &str) -> Option<&str> {
        self.0.get(name)?.first().map(String::as_str)
    }

    /// Iterate over dimensions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no dimension is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Effective values only, as a compact identity for one variant.
    pub fn effective_signature(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.first().map(String::as_str).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Rank how well a record's dimension values match this combination.
    ///
    /// Returns `None` when the record does not belong to the combination. A
    /// lower rank is a better match: each element is the position of the
    /// record's effective value in the corresponding fallback chain. Records
    /// without a value for a dimension (such as the root node) match every
    /// chain at position 0.
    pub fn fallback_rank(&self, record: &Dimensions) -> Option<Vec<usize>> {
        let mut rank = Vec::with_capacity(self.0.len());
        for (name, chain) in &self.0 {
            match record.effective(name) {
                Some(value) => rank.push(chain.iter().position(|c| c == value)?),
                None => rank.push(0),
            }
        }
        Some(rank)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, values) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{}=[{}]", name, values.join(","))?;
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for Dimensions
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dimensions = Self::new();
        for (name, values) in iter {
            dimensions.insert(name, values);
        }
        dimensions
    }
}
