//! Validated ADC request
//!
//! [`AdcRequest`] is produced only by [`crate::validation::validate`]. Every
//! task reads it; none may fail on it.

use crate::method::{AdcClass, Method, Variant};
use crate::options::GroundStateDensity;
use serde::{Deserialize, Serialize};

/// Normalized state counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    /// Singlets (restricted PP)
    pub singlets: usize,
    /// Triplets (restricted PP)
    pub triplets: usize,
    /// States of any spin, including spin-flip states (unrestricted PP)
    pub states: usize,
    /// Spin-flip states (unrestricted PP)
    pub spin_flip: usize,
    /// Alpha ionisations (IP)
    pub ipalpha: usize,
    /// Beta ionisations (IP)
    pub ipbeta: usize,
}

/// Guess vector counts as requested
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessCounts {
    /// Singles guesses (PP)
    pub singles: usize,
    /// Doubles guesses (PP)
    pub doubles: usize,
    /// Hole guesses (IP)
    pub h: usize,
    /// Particle-two-hole guesses (IP)
    pub p2h: usize,
}

impl GuessCounts {
    /// Primary and secondary guess counts for an ADC class
    #[inline]
    #[must_use]
    pub fn for_class(&self, class: AdcClass) -> (usize, usize) {
        match class {
            AdcClass::Pp => (self.singles, self.doubles),
            AdcClass::Ip => (self.h, self.p2h),
        }
    }
}

/// Davidson solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Convergence tolerance
    pub conv_tol: f64,
    /// Iteration limit
    pub max_iter: usize,
    /// Minimal residual norm
    pub residual_min_norm: f64,
    /// Subspace size, 0 for automatic
    pub max_subspace: usize,
}

/// Fully validated ADC request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdcRequest {
    /// Method, with implied variants (`sf`) added
    pub method: Method,
    /// Restricted reference
    pub restricted: bool,
    /// State counts
    pub counts: StateCounts,
    /// Guess counts
    pub guesses: GuessCounts,
    /// Solver settings
    pub solver: SolverSettings,
    /// Solver verbosity
    pub print_level: i32,
    /// Ground state density selection
    pub ground_state_density: Option<GroundStateDensity>,
}

impl AdcRequest {
    /// Check for an active variant
    #[inline]
    #[must_use]
    pub fn has_variant(&self, variant: Variant) -> bool {
        self.method.variants.contains(variant)
    }

    /// Ground state density, defaulting to MP2
    #[inline]
    #[must_use]
    pub fn density(&self) -> GroundStateDensity {
        self.ground_state_density.unwrap_or(GroundStateDensity::Mp2)
    }
}
