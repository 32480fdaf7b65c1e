//! End-to-end run: validate, resolve, build the context, call the solver

use crate::context::{build_input_context, ScfProvider};
use crate::error::AdcError;
use crate::options::RunOptions;
use crate::request::AdcRequest;
use crate::resolver::{Resolution, Resolver, ResolverConfig};
use crate::solver::AdcSolver;
use crate::validation::validate;
use adc_tree::NumericStore;
use tracing::info;

/// Everything the solver needs for one run
#[derive(Debug, Clone)]
pub struct SolverInput {
    /// Validated request
    pub request: AdcRequest,
    /// Resolved parameters
    pub resolution: Resolution,
    /// Numeric input context
    pub context: NumericStore,
}

/// Validate and resolve `method`, and assemble the solver input
///
/// # Errors
///
/// Returns the first validation, resolution or context failure. No task is
/// evaluated for an invalid request.
#[tracing::instrument(level = "info", skip(options, scf, config))]
pub fn prepare(
    method: &str,
    options: &RunOptions,
    scf: &dyn ScfProvider,
    config: ResolverConfig,
) -> Result<SolverInput, AdcError> {
    let reference = scf.build_reference(&options.orbital_selection())?;
    let request = validate(method, &reference.descriptor, options)?;

    let resolution = Resolver::new(config)?.resolve(&request)?;
    let dipole = scf.electric_dipole()?;
    let context = build_input_context(&reference, &dipole)?;

    Ok(SolverInput {
        request,
        resolution,
        context,
    })
}

/// Run `method` with the default resolver configuration
///
/// # Errors
///
/// See [`run_with`].
pub fn run(
    method: &str,
    options: &RunOptions,
    scf: &dyn ScfProvider,
    solver: &dyn AdcSolver,
) -> Result<NumericStore, AdcError> {
    run_with(ResolverConfig::default(), method, options, scf, solver)
}

/// Run `method` and return the solver's output context
///
/// # Errors
///
/// Returns [`AdcError`] for invalid input, a resolution or context failure,
/// or a solver failure.
pub fn run_with(
    config: ResolverConfig,
    method: &str,
    options: &RunOptions,
    scf: &dyn ScfProvider,
    solver: &dyn AdcSolver,
) -> Result<NumericStore, AdcError> {
    let input = prepare(method, options, scf, config)?;
    let output = solver.run(&input.context, &input.resolution.tree)?;
    info!(method, entries = output.len(), "solver finished");
    Ok(output)
}
