//! Error types for archive extraction
//!
//! Provides error handling for:
//! - Missing or mistyped solver output
//! - Negative state counts
//! - Inconsistent tensor shapes across states
//! - Archive write conflicts
//! - Failures of the preceding ADC run

use adc_core::AdcError;
use adc_tree::StoreError;

/// Errors extracting solver output into an archive
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Solver output lacks an expected entry, or holds the wrong type
    #[error("solver output: {0}")]
    Output(#[from] StoreError),

    /// Per-state arrays could not be stacked into one dataset
    #[error("cannot stack dataset '{dataset}': {reason}")]
    Shape {
        /// Dataset being assembled
        dataset: String,
        /// Shape failure
        reason: String,
    },

    /// State count in solver output is negative
    #[error("invalid state count {value} at '{path}'")]
    InvalidCount {
        /// Output entry holding the count
        path: String,
        /// Value found there
        value: i64,
    },

    /// Dataset written twice
    #[error("dataset already exists: {0}")]
    DatasetExists(String),

    /// Invalid group name
    #[error("invalid archive group '{0}'")]
    InvalidGroup(String),

    /// ADC run failed before extraction
    #[error(transparent)]
    Run(#[from] AdcError),
}

impl ExtractError {
    /// Create shape error for a dataset
    pub fn shape(dataset: impl Into<String>, reason: impl ToString) -> Self {
        Self::Shape {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }
}
