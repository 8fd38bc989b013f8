//! Content dimension presets and their combinations.

use std::collections::BTreeMap;

use nodex_common::Dimensions;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One selectable value of a dimension, with its fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionPreset {
    /// Fallback chain, most specific value first.
    pub values: Vec<String>,
}

/// A configured content dimension (e.g. `language`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDimension {
    pub presets: BTreeMap<String, DimensionPreset>,
}

impl ContentDimension {
    /// Builder-style preset declaration.
    pub fn preset<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.presets.insert(
            key.into(),
            DimensionPreset {
                values: values.into_iter().map(Into::into).collect(),
            },
        );
        self
    }
}

/// Enumerates every allowed combination of dimension presets.
#[derive(Debug, Clone, Default)]
pub struct PresetCombinator {
    dimensions: BTreeMap<String, ContentDimension>,
}

impl PresetCombinator {
    /// Create a combinator, rejecting dimensions without presets.
    pub fn new(dimensions: BTreeMap<String, ContentDimension>) -> Result<Self> {
        if let Some((name, _)) = dimensions.iter().find(|(_, d)| d.presets.is_empty()) {
            return Err(Error::EmptyDimension(name.clone()));
        }
        Ok(Self { dimensions })
    }

    /// Cartesian product of all presets, in dimension and preset key order.
    ///
    /// Without any configured dimension there is exactly one, empty,
    /// combination.
    pub fn combinations(&self) -> Vec<Dimensions> {
        let mut combinations = vec![Dimensions::new()];

        for (name, dimension) in &self.dimensions {
            let mut next = Vec::with_capacity(combinations.len() * dimension.presets.len());
            for combination in &combinations {
                for preset in dimension.presets.values() {
                    next.push(combination.clone().with(name.as_str(), preset.values.iter().cloned()));
                }
            }
            combinations = next;
        }

        combinations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combinator() -> PresetCombinator {
        let mut dimensions = BTreeMap::new();
        dimensions.insert(
            "language".to_string(),
            ContentDimension::default()
                .preset("en", ["en"])
                .preset("de", ["de", "en"]),
        );
        dimensions.insert(
            "region".to_string(),
            ContentDimension::default()
                .preset("us", ["us"])
                .preset("gb", ["gb"]),
        );
        PresetCombinator::new(dimensions).unwrap()
    }

    #[test]
    fn test_cartesian_product() {
        let combinations = combinator().combinations();
        assert_eq!(combinations.len(), 4);
        assert_eq!(combinations[0].get("language").unwrap(), ["de", "en"]);
        assert_eq!(combinations[0].effective("region"), Some("gb"));
        assert!(combinations
            .iter()
            .all(|c| c.len() == 2 && c.effective("language").is_some()));
    }

    #[test]
    fn test_no_dimensions() {
        let combinator = PresetCombinator::new(BTreeMap::new()).unwrap();
        assert_eq!(combinator.combinations(), vec![Dimensions::new()]);
    }

    #[test]
    fn test_empty_dimension_rejected() {
        let mut dimensions = BTreeMap::new();
        dimensions.insert("language".to_string(), ContentDimension::default());
        assert!(matches!(
            PresetCombinator::new(dimensions),
            Err(Error::EmptyDimension(_))
        ));
    }
}
