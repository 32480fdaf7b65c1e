//! ADC Core - Parameter tree compiler for ADC excited-state calculations
//!
//! Turns a method string and run options into the parameter tree that
//! drives an external ADC solver:
//! - Parses and validates the method against the reference state
//! - Resolves the task dependency graph of the method
//! - Merges task contributions without silent collisions
//! - Builds the numeric input context and hands both to the solver
//!
//! # Core Concepts
//!
//! - [`Method`]: Base method plus variant flags (`cvs`, `sf`)
//! - [`RunOptions`]: Serde-loadable run options with defaults
//! - [`AdcRequest`]: Immutable, validated request read by every task
//! - [`TaskId`]: Closed catalogue of configuration tasks
//! - [`Resolver`]: Walks the task DAG and merges contributions
//! - [`AdcSolver`] / [`ScfProvider`]: Seams to the external collaborators
//!
//! # Example
//!
//! ```rust
//! use adc_core::{validate, ReferenceDescriptor, Resolver, ResolverConfig, RunOptions};
//!
//! let options = RunOptions::new().with_singlets(5).with_triplets(3);
//! let request = validate("adc2", &ReferenceDescriptor::restricted_singlet(), &options)?;
//!
//! let resolver = Resolver::new(ResolverConfig::default())?;
//! let resolution = resolver.resolve(&request)?;
//!
//! assert_eq!(resolution.tree.get("adc_pp/adc2s/rhf/singlets/0/nroots"), Some("5"));
//! assert_eq!(resolution.tree.get("adc_pp/adc2s/rhf/triplets/0/nroots"), Some("3"));
//! # Ok::<(), adc_core::AdcError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

// Core modules
pub mod context;
pub mod dag;
pub mod error;
pub mod method;
pub mod options;
pub mod reference;
pub mod request;
pub mod resolver;
pub mod runner;
pub mod solver;
pub mod tasks;
pub mod validation;

// Re-exports for convenience
pub use context::{build_input_context, ScfProvider};
pub use dag::TaskGraph;
pub use error::{AdcError, ContextError, ErrorCategory, OptionsError, ResolveError, SolverError};
pub use method::{variant_name, AdcClass, BaseMethod, Method, Variant, VariantSet};
pub use options::{GroundStateDensity, OrbitalSelection, RunOptions};
pub use reference::{ReferenceDescriptor, ReferenceState};
pub use request::{AdcRequest, GuessCounts, SolverSettings, StateCounts};
pub use resolver::{Resolution, Resolver, ResolverConfig};
pub use runner::{prepare, run, run_with, SolverInput};
pub use solver::AdcSolver;
pub use tasks::{catalogue, Task, TaskId};
pub use validation::validate;

pub use adc_merge::MergePolicy;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with ADC Core
    pub use crate::{
        run, validate, AdcError, AdcRequest, AdcSolver, GroundStateDensity, Method, MergePolicy,
        ReferenceDescriptor, Resolver, ResolverConfig, RunOptions, ScfProvider, TaskId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn toml_options_to_tree() {
        let options = RunOptions::from_toml_str(
            r#"
            n_states = 4
            conv_tol = 1e-8
            print_level = 3
            "#,
        )
        .unwrap();
        let request = validate("adc1", &ReferenceDescriptor::unrestricted(2), &options).unwrap();
        let tree = Resolver::new(ResolverConfig::default())
            .unwrap()
            .resolve(&request)
            .unwrap()
            .tree;

        assert_eq!(tree.get("adc_pp/adc1/uhf"), Some("1"));
        assert_eq!(tree.get("adc_pp/adc1/uhf/0/spin"), Some("any"));
        assert_eq!(tree.get("adc_pp/adc1/uhf/0/davidson/convergence"), Some("1e-08"));
        assert_eq!(tree.get("adc_pp/adc1/print/nampl"), Some("40"));
        assert_eq!(tree.get("print_level"), Some("3"));
    }

    #[test]
    fn invalid_input_never_reaches_tasks() {
        let err = validate(
            "adc2",
            &ReferenceDescriptor::restricted_singlet(),
            &RunOptions::new().with_states(5),
        )
        .unwrap_err();
        assert!(err.is_input_error());
    }
}
