//! ADC Merge Strategies
//!
//! Pluggable collision handling for merging task contributions into one
//! parameter tree.
//!
//! # Core Concepts
//!
//! - [`MergeStrategy`]: Core trait for merge strategies
//! - [`StrictStrategy`]: Disagreeing writers are an error (default)
//! - [`LastWriterStrategy`]: Later contributions overwrite earlier ones
//! - [`MergePolicy`]: Configurable strategy selection
//! - [`Composition`]: Merged tree plus the owning task of every leaf
//!
//! # Example
//!
//! ```rust
//! use adc_merge::{Contribution, MergePolicy};
//! use adc_tree::ParameterTree;
//!
//! let hf: ParameterTree = [("hf/prop", "1")].into_iter().collect();
//! let mp1: ParameterTree = [("mp1", "1")].into_iter().collect();
//!
//! let strategy = MergePolicy::default().strategy();
//! let merged = strategy
//!     .compose(&[Contribution::new("hf", hf), Contribution::new("mp1", mp1)])
//!     .unwrap();
//! assert_eq!(merged.tree.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Strategy implementations
mod last_writer;
mod policy;
mod strategy;
mod strict;

// Re-exports
pub use last_writer::LastWriterStrategy;
pub use policy::{MergePolicy, UnknownPolicy};
pub use strategy::{
    Composition, ConflictError, ConflictKind, Contribution, MergeError, MergeStrategy, Validation,
    ValidationDiagnostic,
};
pub use strict::StrictStrategy;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use adc_tree::ParameterTree;

    fn contributions() -> Vec<Contribution> {
        vec![
            Contribution::new(
                "mp2",
                [("mp2", "1"), ("mp2/prop/rsq", "0")].into_iter().collect::<ParameterTree>(),
            ),
            Contribution::new(
                "override",
                [("mp2/prop/rsq", "1")].into_iter().collect::<ParameterTree>(),
            ),
        ]
    }

    #[test]
    fn policies_disagree_on_collisions() {
        let strict = MergePolicy::Strict.strategy();
        assert!(strict.compose(&contributions()).is_err());

        let lenient = MergePolicy::LastWriterWins.strategy();
        let merged = lenient.compose(&contributions()).unwrap();
        assert_eq!(merged.tree.get("mp2/prop/rsq"), Some("1"));
    }

    #[test]
    fn policies_agree_without_collisions() {
        let disjoint = vec![
            Contribution::new("hf", [("hf/prop", "1")].into_iter().collect::<ParameterTree>()),
            Contribution::new("mp1", [("mp1", "1")].into_iter().collect::<ParameterTree>()),
        ];

        let strict = StrictStrategy::new().compose(&disjoint).unwrap();
        let lenient = LastWriterStrategy::new().compose(&disjoint).unwrap();
        assert_eq!(strict, lenient);
    }
}
