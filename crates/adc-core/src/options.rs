//! Run options
//!
//! [`RunOptions`] holds everything a caller may configure for one ADC run.
//! Options are plain data; all cross-field rules are enforced by
//! [`crate::validation::validate`].

use crate::error::OptionsError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Ground state density used by third-order methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundStateDensity {
    /// MP2 density (the default for ADC(3))
    Mp2,
    /// MP3 density
    Mp3,
    /// MP3 density iterated with the Dyson expansion method
    Dyson,
}

impl GroundStateDensity {
    /// Option value
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp2 => "mp2",
            Self::Mp3 => "mp3",
            Self::Dyson => "dyson",
        }
    }
}

impl Display for GroundStateDensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroundStateDensity {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp2" => Ok(Self::Mp2),
            "mp3" => Ok(Self::Mp3),
            "dyson" => Ok(Self::Dyson),
            other => Err(OptionsError::UnknownDensity(other.to_string())),
        }
    }
}

/// Options of one ADC run
///
/// Unset state counts are `None`; which of them may be set depends on the
/// method family and the reference state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOptions {
    /// Orbitals placed in the core-occupied space
    pub core_orbitals: Vec<usize>,
    /// Inactive occupied orbitals
    pub frozen_core: Vec<usize>,
    /// Inactive virtual orbitals
    pub frozen_virtual: Vec<usize>,

    /// Singlet states (restricted singlet references)
    pub n_singlets: Option<usize>,
    /// Triplet states (restricted singlet references)
    pub n_triplets: Option<usize>,
    /// States of any spin (other references)
    pub n_states: Option<usize>,
    /// Spin-flip states (other references)
    pub n_spin_flip: Option<usize>,

    /// Davidson subspace size, 0 for automatic
    pub max_subspace: usize,
    /// Residual norm convergence tolerance
    pub conv_tol: f64,
    /// Davidson iteration limit
    pub max_iter: usize,
    /// Solver verbosity
    pub print_level: i32,
    /// Minimal norm of a residual accepted as new subspace vector
    pub residual_min_norm: f64,

    /// Singles guess vectors (PP)
    pub n_guess_singles: usize,
    /// Doubles guess vectors (PP)
    pub n_guess_doubles: usize,
    /// Hole guess vectors (IP)
    pub n_guess_h: usize,
    /// Particle-two-hole guess vectors (IP)
    pub n_guess_p2h: usize,

    /// Alpha ionisations (non restricted-singlet references)
    pub n_ipalpha: Option<usize>,
    /// Beta ionisations
    pub n_ipbeta: Option<usize>,

    /// Ground state density for third-order methods
    pub ground_state_density: Option<GroundStateDensity>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            core_orbitals: Vec::new(),
            frozen_core: Vec::new(),
            frozen_virtual: Vec::new(),
            n_singlets: None,
            n_triplets: None,
            n_states: None,
            n_spin_flip: None,
            max_subspace: 0,
            conv_tol: 1e-6,
            max_iter: 60,
            print_level: 1,
            residual_min_norm: 1e-12,
            n_guess_singles: 0,
            n_guess_doubles: 0,
            n_guess_h: 0,
            n_guess_p2h: 0,
            n_ipalpha: None,
            n_ipbeta: None,
            ground_state_density: None,
        }
    }
}

impl RunOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from TOML
    ///
    /// # Errors
    /// Returns error on malformed TOML, unknown keys or bad values
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from JSON
    ///
    /// # Errors
    /// Returns error on malformed JSON, unknown keys or bad values
    pub fn from_json_str(text: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(text)?)
    }

    /// With singlet count
    #[inline]
    #[must_use]
    pub fn with_singlets(mut self, n: usize) -> Self {
        self.n_singlets = Some(n);
        self
    }

    /// With triplet count
    #[inline]
    #[must_use]
    pub fn with_triplets(mut self, n: usize) -> Self {
        self.n_triplets = Some(n);
        self
    }

    /// With state count
    #[inline]
    #[must_use]
    pub fn with_states(mut self, n: usize) -> Self {
        self.n_states = Some(n);
        self
    }

    /// With spin-flip state count
    #[inline]
    #[must_use]
    pub fn with_spin_flip(mut self, n: usize) -> Self {
        self.n_spin_flip = Some(n);
        self
    }

    /// With alpha ionisation count
    #[inline]
    #[must_use]
    pub fn with_ipalpha(mut self, n: usize) -> Self {
        self.n_ipalpha = Some(n);
        self
    }

    /// With beta ionisation count
    #[inline]
    #[must_use]
    pub fn with_ipbeta(mut self, n: usize) -> Self {
        self.n_ipbeta = Some(n);
        self
    }

    /// With core-occupied orbitals
    #[inline]
    #[must_use]
    pub fn with_core_orbitals(mut self, orbitals: Vec<usize>) -> Self {
        self.core_orbitals = orbitals;
        self
    }

    /// With PP guess counts
    #[inline]
    #[must_use]
    pub fn with_pp_guesses(mut self, singles: usize, doubles: usize) -> Self {
        self.n_guess_singles = singles;
        self.n_guess_doubles = doubles;
        self
    }

    /// With IP guess counts
    #[inline]
    #[must_use]
    pub fn with_ip_guesses(mut self, h: usize, p2h: usize) -> Self {
        self.n_guess_h = h;
        self.n_guess_p2h = p2h;
        self
    }

    /// With Davidson subspace size
    #[inline]
    #[must_use]
    pub fn with_max_subspace(mut self, size: usize) -> Self {
        self.max_subspace = size;
        self
    }

    /// With convergence tolerance
    #[inline]
    #[must_use]
    pub fn with_conv_tol(mut self, tol: f64) -> Self {
        self.conv_tol = tol;
        self
    }

    /// With iteration limit
    #[inline]
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// With solver verbosity
    #[inline]
    #[must_use]
    pub fn with_print_level(mut self, level: i32) -> Self {
        self.print_level = level;
        self
    }

    /// With ground state density
    #[inline]
    #[must_use]
    pub fn with_ground_state_density(mut self, density: GroundStateDensity) -> Self {
        self.ground_state_density = Some(density);
        self
    }

    /// Orbital selection forwarded to the reference state builder
    #[must_use]
    pub fn orbital_selection(&self) -> OrbitalSelection {
        OrbitalSelection {
            core_orbitals: self.core_orbitals.clone(),
            frozen_core: self.frozen_core.clone(),
            frozen_virtual: self.frozen_virtual.clone(),
        }
    }
}

/// Orbital subspace selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitalSelection {
    /// Core-occupied orbitals
    pub core_orbitals: Vec<usize>,
    /// Frozen core orbitals
    pub frozen_core: Vec<usize>,
    /// Frozen virtual orbitals
    pub frozen_virtual: Vec<usize>,
}
