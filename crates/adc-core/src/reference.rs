//! Reference state description
//!
//! The reference state is built by an external SCF frontend. The core only
//! reads the few properties that gate which state requests are legal, plus
//! the data that goes into the solver's input context.

use adc_tree::NumericStore;
use serde::{Deserialize, Serialize};

/// Symmetry properties of a reference state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceDescriptor {
    /// Restricted (closed-shell) orbitals
    pub restricted: bool,
    /// Spin multiplicity `2S+1`
    pub spin_multiplicity: u32,
    /// Core-occupied orbitals were selected
    pub has_core_occupied_space: bool,
}

impl ReferenceDescriptor {
    /// Restricted singlet reference
    #[inline]
    #[must_use]
    pub fn restricted_singlet() -> Self {
        Self {
            restricted: true,
            spin_multiplicity: 1,
            has_core_occupied_space: false,
        }
    }

    /// Unrestricted reference of the given multiplicity
    #[inline]
    #[must_use]
    pub fn unrestricted(spin_multiplicity: u32) -> Self {
        Self {
            restricted: false,
            spin_multiplicity,
            has_core_occupied_space: false,
        }
    }

    /// With core-occupied space
    #[inline]
    #[must_use]
    pub fn with_core(mut self, has_core: bool) -> Self {
        self.has_core_occupied_space = has_core;
        self
    }

    /// Singlet/triplet counts apply only to restricted singlets
    #[inline]
    #[must_use]
    pub fn is_restricted_singlet(&self) -> bool {
        self.restricted && self.spin_multiplicity == 1
    }
}

/// A built reference state
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceState {
    /// Symmetry properties
    pub descriptor: ReferenceDescriptor,
    /// Total nuclear charge
    pub nuclear_total_charge: f64,
    /// Nuclear dipole moment
    pub nuclear_dipole: [f64; 3],
    /// Orbital data in solver layout
    pub context: NumericStore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restricted_singlet_detection() {
        assert!(ReferenceDescriptor::restricted_singlet().is_restricted_singlet());
        assert!(!ReferenceDescriptor::unrestricted(1).is_restricted_singlet());

        let restricted_triplet = ReferenceDescriptor {
            restricted: true,
            spin_multiplicity: 3,
            has_core_occupied_space: false,
        };
        assert!(!restricted_triplet.is_restricted_singlet());
    }

    #[test]
    fn with_core() {
        let reference = ReferenceDescriptor::unrestricted(2).with_core(true);
        assert!(reference.has_core_occupied_space);
        assert!(!reference.restricted);
    }
}
