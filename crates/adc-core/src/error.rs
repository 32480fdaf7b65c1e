//! Error types for ADC Core
//!
//! Provides error handling for:
//! - Malformed method strings
//! - Inconsistent state requests
//! - Reference/variant mismatches
//! - Unsupported feature combinations
//! - Task resolution, input context and solver failures

use adc_merge::MergeError;
use adc_tree::StoreError;

/// Main ADC error type
#[derive(Debug, thiserror::Error)]
pub enum AdcError {
    /// Method string is not one of the known methods
    #[error("invalid ADC method: {0}")]
    InvalidMethod(String),

    /// Requested state counts are inconsistent
    #[error("invalid state request ({option}): {reason}")]
    InvalidStateRequest {
        /// Offending option
        option: &'static str,
        /// Violated constraint
        reason: String,
    },

    /// Reference state does not fit the requested variant
    #[error("reference mismatch: {0}")]
    ReferenceMismatch(String),

    /// Feature combination the solver does not implement
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Run options could not be loaded
    #[error("configuration error: {0}")]
    Options(#[from] OptionsError),

    /// Task resolution failed
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// Input context could not be built
    #[error("input context error: {0}")]
    Context(#[from] ContextError),

    /// External solver failed
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}

impl AdcError {
    /// Create state request error
    #[inline]
    #[must_use]
    pub fn state_request(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidStateRequest {
            option,
            reason: reason.into(),
        }
    }

    /// Classify the error
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidMethod(_) => ErrorCategory::MalformedMethod,
            Self::InvalidStateRequest { .. } => ErrorCategory::StateRequest,
            Self::ReferenceMismatch(_) => ErrorCategory::ReferenceMismatch,
            Self::Unsupported(_) => ErrorCategory::Unsupported,
            Self::Options(_) => ErrorCategory::Configuration,
            Self::Resolve(_) => ErrorCategory::Resolution,
            Self::Context(_) => ErrorCategory::Context,
            Self::Solver(_) => ErrorCategory::Solver,
        }
    }

    /// Check if the error was raised while validating user input
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::MalformedMethod
                | ErrorCategory::StateRequest
                | ErrorCategory::ReferenceMismatch
                | ErrorCategory::Unsupported
                | ErrorCategory::Configuration
        )
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Unknown method string
    MalformedMethod,
    /// Inconsistent state counts
    StateRequest,
    /// Reference/variant mismatch
    ReferenceMismatch,
    /// Unimplemented feature combination
    Unsupported,
    /// Unreadable options
    Configuration,
    /// Task graph or merge failure
    Resolution,
    /// Bad input context data
    Context,
    /// External solver failure
    Solver,
}

/// Errors loading run options
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// TOML parse failure
    #[error("invalid TOML options: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parse failure
    #[error("invalid JSON options: {0}")]
    Json(#[from] serde_json::Error),

    /// Unrecognised ground state density
    #[error("unrecognised ground_state_density '{0}' (expected mp2, mp3 or dyson)")]
    UnknownDensity(String),
}

/// Task resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No task with this name
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// Dependency cycle in the task catalogue
    #[error("cyclic task dependency involving '{task}'")]
    CyclicDependency {
        /// A task on the cycle
        task: String,
    },

    /// Supplied evaluation order is not a topological order of the closure
    #[error("invalid evaluation order: {0}")]
    InvalidOrder(String),

    /// Contributions could not be merged
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),
}

/// Input context errors
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// Dipole integral matrix is not square
    #[error("dipole integrals d{component}_bb must be square, got {rows}x{cols}")]
    NonSquareIntegrals {
        /// Cartesian component (`x`, `y`, `z`)
        component: char,
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// SCF data could not be read
    #[error("SCF data unavailable: {0}")]
    ScfData(String),

    /// Store access failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// External solver errors
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Solver reported a failure
    #[error("solver failed: {0}")]
    Failed(String),

    /// Solver did not converge
    #[error("not converged after {iterations} iterations")]
    NotConverged {
        /// Iterations performed
        iterations: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adc_error_display() {
        let err = AdcError::InvalidMethod("adc4".to_string());
        assert_eq!(err.to_string(), "invalid ADC method: adc4");

        let err = AdcError::state_request("n_states", "n_states not allowed for restricted reference");
        assert!(err.to_string().contains("(n_states)"));
    }

    #[test]
    fn adc_error_category() {
        assert_eq!(
            AdcError::ReferenceMismatch("CVS requires core orbitals".into()).category(),
            ErrorCategory::ReferenceMismatch
        );
        assert_eq!(
            AdcError::from(SolverError::Failed("boom".into())).category(),
            ErrorCategory::Solver
        );
    }

    #[test]
    fn adc_error_is_input_error() {
        assert!(AdcError::Unsupported("x".into()).is_input_error());
        assert!(!AdcError::from(ResolveError::UnknownTask("x".into())).is_input_error());
    }

    #[test]
    fn context_error_names_component() {
        let err = ContextError::NonSquareIntegrals {
            component: 'y',
            rows: 3,
            cols: 4,
        };
        assert_eq!(err.to_string(), "dipole integrals dy_bb must be square, got 3x4");
    }
}
