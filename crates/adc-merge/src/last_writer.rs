//! Last-writer-wins merge strategy
//!
//! Contributions are applied in the given order; a later contribution
//! overwrites any leaf an earlier one wrote.

use crate::strategy::{
    ensure_unique_sources, Composition, Contribution, MergeError, MergeStrategy, Validation,
};
use std::collections::BTreeMap;

/// Sequential overwrite in contribution order
///
/// # Characteristics
/// - Never fails on value collisions
/// - Result depends on contribution order when writers disagree
/// - Owner of a leaf is its last writer
#[derive(Debug, Clone, Copy, Default)]
pub struct LastWriterStrategy;

impl LastWriterStrategy {
    /// Create new last-writer-wins strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MergeStrategy for LastWriterStrategy {
    fn validate(&self, contributions: &[Contribution]) -> Result<Validation, MergeError> {
        ensure_unique_sources(contributions)?;

        let mut seen: BTreeMap<_, &str> = BTreeMap::new();
        let mut validation = Validation::default();
        for contribution in contributions {
            for (path, value) in contribution.tree.iter() {
                validation.leaf_count += 1;
                if let Some(previous) = seen.insert(path, value) {
                    validation.shared_leaves += 1;
                    if previous != value {
                        validation.overwritten += 1;
                    }
                }
            }
        }
        Ok(validation)
    }

    fn compose(&self, contributions: &[Contribution]) -> Result<Composition, MergeError> {
        ensure_unique_sources(contributions)?;

        let mut composition = Composition::default();
        for contribution in contributions {
            composition.tree.merge(&contribution.tree);
            for path in contribution.tree.paths() {
                composition
                    .owners
                    .insert(path.clone(), contribution.source.clone());
            }
        }
        Ok(composition)
    }

    fn name(&self) -> &'static str {
        "LastWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adc_tree::ParameterTree;

    fn contribution(source: &str, leaves: &[(&str, &str)]) -> Contribution {
        Contribution::new(source, leaves.iter().copied().collect::<ParameterTree>())
    }

    #[test]
    fn last_writer_strategy_new() {
        assert_eq!(LastWriterStrategy::new().name(), "LastWriter");
    }

    #[test]
    fn last_writer_overwrites_in_order() {
        let contributions = vec![
            contribution("first", &[("x", "a"), ("y", "1")]),
            contribution("second", &[("x", "b")]),
        ];

        let composition = LastWriterStrategy::new().compose(&contributions).unwrap();
        assert_eq!(composition.tree.get("x"), Some("b"));
        assert_eq!(composition.owner(&"x".parse().unwrap()), Some("second"));
        assert_eq!(composition.owner(&"y".parse().unwrap()), Some("first"));
    }

    #[test]
    fn last_writer_validation_counts_overwrites() {
        let contributions = vec![
            contribution("first", &[("x", "a"), ("y", "1")]),
            contribution("second", &[("x", "b"), ("y", "1")]),
        ];

        let validation = LastWriterStrategy::new().validate(&contributions).unwrap();
        assert_eq!(validation.leaf_count, 4);
        assert_eq!(validation.shared_leaves, 2);
        assert_eq!(validation.overwritten, 1);
    }
}
