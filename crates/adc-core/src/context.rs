//! Solver input context
//!
//! The SCF frontend is an external collaborator; [`ScfProvider`] is the
//! seam through which the runner obtains the reference state and the
//! electric dipole integrals.

use crate::error::ContextError;
use crate::options::OrbitalSelection;
use crate::reference::ReferenceState;
use adc_tree::NumericStore;
use ndarray::Array2;

/// Number of multipole entries stored at `ao/nucmm`
pub const NUCMM_LEN: usize = 10;

/// Cartesian components of the dipole operator, in storage order
const COMPONENTS: [char; 3] = ['x', 'y', 'z'];

/// Source of mean-field data
pub trait ScfProvider {
    /// Build the reference state for an orbital selection
    ///
    /// The selection decides whether the reference has a core-occupied
    /// space.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::ScfData`] if the SCF data cannot be read.
    fn build_reference(&self, selection: &OrbitalSelection) -> Result<ReferenceState, ContextError>;

    /// Electric dipole integrals in the AO basis, `[x, y, z]`
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::ScfData`] if the integrals are unavailable.
    fn electric_dipole(&self) -> Result<[Array2<f64>; 3], ContextError>;
}

/// Nuclear multipole vector: total charge, dipole, then zeroed quadrupole
#[must_use]
pub fn nuclear_multipoles(reference: &ReferenceState) -> Vec<f64> {
    let mut nucmm = Vec::with_capacity(NUCMM_LEN);
    nucmm.push(reference.nuclear_total_charge);
    nucmm.extend_from_slice(&reference.nuclear_dipole);
    nucmm.resize(NUCMM_LEN, 0.0);
    nucmm
}

/// Assemble the numeric input context handed to the solver
///
/// # Errors
///
/// Returns [`ContextError::NonSquareIntegrals`] if a dipole component is
/// not a square matrix.
pub fn build_input_context(
    reference: &ReferenceState,
    dipole: &[Array2<f64>; 3],
) -> Result<NumericStore, ContextError> {
    let mut context = reference.context.clone();
    context.insert("ao/nucmm", nuclear_multipoles(reference));

    for (component, integrals) in COMPONENTS.into_iter().zip(dipole) {
        let (rows, cols) = integrals.dim();
        if rows != cols {
            return Err(ContextError::NonSquareIntegrals {
                component,
                rows,
                cols,
            });
        }
        context.insert(format!("ao/d{component}_bb"), integrals.clone());
    }
    Ok(context)
}
