//! Strict merge strategy
//!
//! Default strategy: every leaf has a single value across all
//! contributions. Two tasks may write the same leaf only if they agree.

use crate::strategy::{
    ensure_unique_sources, Composition, ConflictError, ConflictKind, Contribution, MergeError,
    MergeStrategy, Validation, ValidationDiagnostic,
};

/// Strict strategy: disagreeing writers are an error
///
/// # Characteristics
/// - Result independent of contribution order
/// - Reports all collisions at once from `validate()`
/// - Owner of a shared leaf is its first writer
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictStrategy;

impl StrictStrategy {
    /// Create new strict strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fold contributions in order, keeping the first writer of each leaf
    ///
    /// Each contribution is checked against the tree merged so far with
    /// [`ParameterTree::conflicts_with`](adc_tree::ParameterTree::conflicts_with).
    fn scan(contributions: &[Contribution]) -> (Composition, Validation, Vec<ConflictError>) {
        let mut merged = Composition::default();
        let mut validation = Validation::default();
        let mut conflicts = Vec::new();

        for contribution in contributions {
            for conflict in merged.tree.conflicts_with(&contribution.tree) {
                let existing_source = merged.owner(&conflict.path).unwrap_or_default().to_string();
                conflicts.push(ConflictError {
                    path: conflict.path,
                    existing_source,
                    existing: conflict.existing,
                    incoming_source: contribution.source.clone(),
                    incoming: conflict.incoming,
                });
            }

            for (path, value) in contribution.tree.iter() {
                validation.leaf_count += 1;
                if merged.tree.contains(path) {
                    validation.shared_leaves += 1;
                    continue;
                }
                merged.tree.set(path, value);
                merged.owners.insert(path.clone(), contribution.source.clone());
            }
        }

        (merged, validation, conflicts)
    }
}

impl MergeStrategy for StrictStrategy {
    fn validate(&self, contributions: &[Contribution]) -> Result<Validation, MergeError> {
        ensure_unique_sources(contributions)?;

        let (_, validation, conflicts) = Self::scan(contributions);
        if conflicts.is_empty() {
            return Ok(validation);
        }

        let mut involved: Vec<String> = Vec::new();
        for conflict in &conflicts {
            for source in [&conflict.existing_source, &conflict.incoming_source] {
                if !involved.contains(source) {
                    involved.push(source.clone());
                }
            }
        }

        Err(MergeError::validation_failed(ValidationDiagnostic {
            kind: ConflictKind::ValueMismatch,
            involved,
            description: format!("{} conflicting leaf value(s)", conflicts.len()),
            conflicts,
        }))
    }

    fn compose(&self, contributions: &[Contribution]) -> Result<Composition, MergeError> {
        ensure_unique_sources(contributions)?;

        let (composition, _, conflicts) = Self::scan(contributions);
        match conflicts.into_iter().next() {
            Some(conflict) => Err(MergeError::Conflict(conflict)),
            None => Ok(composition),
        }
    }

    fn name(&self) -> &'static str {
        "Strict"
    }
}
