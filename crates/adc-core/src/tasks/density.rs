//! Third-order ground state density
//!
//! Computes the MP3 density, or iterates it with the Dyson expansion
//! method. The default MP2 density needs no work here.

use crate::options::GroundStateDensity;
use crate::request::AdcRequest;
use adc_tree::value::format_float;
use adc_tree::ParameterTree;

/// Iteration limit of the density iterations
const DENSITY_MAX_ITER: &str = "1000";

/// Iterated density block
pub(crate) fn dyson_expansion_method(request: &AdcRequest) -> ParameterTree {
    let order = match request.density() {
        GroundStateDensity::Mp2 => return ParameterTree::new(),
        GroundStateDensity::Mp3 => "3",
        GroundStateDensity::Dyson => "3+",
    };

    let mut params = ParameterTree::new();
    params.set_flag("iterated_density", true);

    let mut tdem = params.submap("iterated_density");
    tdem.set_flag("direct", true);
    tdem.set("convergence", format_float(request.solver.conv_tol / 100.0));
    tdem.set("maxiter", DENSITY_MAX_ITER);
    tdem.set("order", order);
    params
}
