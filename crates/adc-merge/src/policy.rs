//! Merge policy selection
//!
//! Provides [`MergePolicy`], the configurable name of a merge strategy.

use crate::last_writer::LastWriterStrategy;
use crate::strategy::MergeStrategy;
use crate::strict::StrictStrategy;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Selectable merge policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Fail on disagreeing writers (default)
    #[default]
    Strict,

    /// Later contributions overwrite earlier ones
    LastWriterWins,
}

impl MergePolicy {
    /// All policies
    pub const ALL: [Self; 2] = [Self::Strict, Self::LastWriterWins];

    /// Configuration name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::LastWriterWins => "last_writer_wins",
        }
    }

    /// Strategy implementing this policy
    #[must_use]
    pub fn strategy(&self) -> Box<dyn MergeStrategy> {
        match self {
            Self::Strict => Box::new(StrictStrategy::new()),
            Self::LastWriterWins => Box::new(LastWriterStrategy::new()),
        }
    }
}

impl Display for MergePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// Unrecognised policy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown merge policy '{0}' (expected strict or last_writer_wins)")]
pub struct UnknownPolicy(pub String);
