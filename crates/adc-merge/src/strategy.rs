//! Merge strategy trait and core types
//!
//! Provides the [`MergeStrategy`] trait for combining the parameter
//! contributions of independent tasks into one tree.

use adc_tree::{ParameterTree, TreePath};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Merge strategy for task contributions
///
/// # Invariants
/// `compose()` must be deterministic for a given contribution order, and
/// `validate()` must report every collision that `compose()` would reject.
pub trait MergeStrategy: Send + Sync + std::fmt::Debug {
    /// Check that the contributions can be merged under this strategy
    ///
    /// # Errors
    /// Returns [`MergeError::ValidationFailed`] with a diagnostic listing
    /// every offending leaf
    fn validate(&self, contributions: &[Contribution]) -> Result<Validation, MergeError>;

    /// Merge contributions in the given order
    ///
    /// # Errors
    /// Returns error if the contributions are not mergeable
    fn compose(&self, contributions: &[Contribution]) -> Result<Composition, MergeError>;

    /// Strategy name (for logging/configuration)
    fn name(&self) -> &'static str;
}

/// The tree fragment owned by one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    /// Contributing task
    pub source: String,
    /// Leaves written by the task
    pub tree: ParameterTree,
}

impl Contribution {
    /// Create a contribution
    #[inline]
    #[must_use]
    pub fn new(source: impl Into<String>, tree: ParameterTree) -> Self {
        Self {
            source: source.into(),
            tree,
        }
    }
}

/// Result of a successful validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validation {
    /// Total leaves across all contributions
    pub leaf_count: usize,
    /// Leaves written by more than one contribution
    pub shared_leaves: usize,
    /// Shared leaves whose value differs between writers
    pub overwritten: usize,
}

/// A merged tree plus the task that owns each leaf
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    /// Merged tree
    pub tree: ParameterTree,
    /// Owning task per leaf
    pub owners: BTreeMap<TreePath, String>,
}

impl Composition {
    /// Task that wrote the final value at `path`
    #[must_use]
    pub fn owner(&self, path: &TreePath) -> Option<&str> {
        self.owners.get(path).map(String::as_str)
    }
}

/// Two contributions disagree on a leaf
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "conflicting values for '{path}': '{existing}' from {existing_source}, \
     '{incoming}' from {incoming_source}"
)]
pub struct ConflictError {
    /// Contested leaf
    pub path: TreePath,
    /// Task that wrote first
    pub existing_source: String,
    /// Value written first
    pub existing: String,
    /// Task that wrote second
    pub incoming_source: String,
    /// Value written second
    pub incoming: String,
}

/// Merge error with diagnostics
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Validation failed
    #[error("validation failed: {diagnostic}")]
    ValidationFailed {
        /// Detailed diagnostic
        diagnostic: ValidationDiagnostic,
    },

    /// Single collision found while composing
    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

impl MergeError {
    /// Create validation failed error
    #[inline]
    #[must_use]
    pub fn validation_failed(diagnostic: ValidationDiagnostic) -> Self {
        Self::ValidationFailed { diagnostic }
    }

    /// Every collision carried by this error
    #[must_use]
    pub fn conflicts(&self) -> &[ConflictError] {
        match self {
            Self::ValidationFailed { diagnostic } => &diagnostic.conflicts,
            Self::Conflict(conflict) => std::slice::from_ref(conflict),
        }
    }
}

/// Detailed validation failure diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    /// Kind of failure
    pub kind: ConflictKind,

    /// Involved tasks, in contribution order
    pub involved: Vec<String>,

    /// Human-readable description
    pub description: String,

    /// Offending leaves
    pub conflicts: Vec<ConflictError>,
}

impl Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.description)
    }
}

/// Types of merge failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Same leaf written with different values
    ValueMismatch,

    /// Same task contributed twice
    DuplicateSource,
}

/// Reject contributions that share a source name
pub(crate) fn ensure_unique_sources(contributions: &[Contribution]) -> Result<(), MergeError> {
    let mut seen = std::collections::BTreeSet::new();
    for contribution in contributions {
        if !seen.insert(contribution.source.as_str()) {
            return Err(MergeError::validation_failed(ValidationDiagnostic {
                kind: ConflictKind::DuplicateSource,
                involved: vec![contribution.source.clone()],
                description: format!("task '{}' contributed twice", contribution.source),
                conflicts: vec![],
            }));
        }
    }
    Ok(())
}
