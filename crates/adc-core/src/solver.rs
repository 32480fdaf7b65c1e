//! External ADC solver interface

use crate::error::SolverError;
use adc_tree::{NumericStore, ParameterTree};

/// An ADC solver consuming a parameter tree and an input context
///
/// The solver is opaque: it reads the tree and the context and produces an
/// output context addressed by the paths the tree enabled.
pub trait AdcSolver {
    /// Run the solver
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if the solver fails or does not converge.
    fn run(&self, context: &NumericStore, params: &ParameterTree) -> Result<NumericStore, SolverError>;
}

impl<S: AdcSolver + ?Sized> AdcSolver for &S {
    fn run(&self, context: &NumericStore, params: &ParameterTree) -> Result<NumericStore, SolverError> {
        (**self).run(context, params)
    }
}
