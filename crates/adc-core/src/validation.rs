//! Method and state request validation
//!
//! [`validate`] is the single gate between user input and the task
//! catalogue: every rule a task could trip over is checked here, so task
//! contributions are infallible.

use crate::error::AdcError;
use crate::method::{AdcClass, Method, Variant};
use crate::options::{GroundStateDensity, RunOptions};
use crate::reference::ReferenceDescriptor;
use crate::request::{AdcRequest, GuessCounts, SolverSettings, StateCounts};

/// Validate a method string and run options against a reference state
///
/// # Errors
/// Returns the first violated rule:
/// - [`AdcError::InvalidMethod`] for an unknown method string
/// - [`AdcError::InvalidStateRequest`] for inconsistent state counts
/// - [`AdcError::ReferenceMismatch`] for CVS/core orbital mismatches
/// - [`AdcError::Unsupported`] for feature combinations without solver support
#[tracing::instrument(level = "debug", skip(reference, options))]
pub fn validate(
    method: &str,
    reference: &ReferenceDescriptor,
    options: &RunOptions,
) -> Result<AdcRequest, AdcError> {
    let mut method = Method::parse(method)?;

    let counts = match method.class() {
        AdcClass::Pp => check_pp_counts(reference, options)?,
        AdcClass::Ip => check_ip_counts(reference, options)?,
    };
    if counts.spin_flip > 0 {
        method.variants.insert(Variant::SpinFlip);
    }

    check_core_space(&method, reference)?;

    match method.class() {
        AdcClass::Pp => check_pp_reference(&method, reference, &counts)?,
        AdcClass::Ip => check_ip_reference(&method, reference, &counts)?,
    }
    check_ground_state_density(&method, options.ground_state_density)?;

    tracing::debug!(
        method = %method,
        restricted = reference.restricted,
        "request validated"
    );

    Ok(AdcRequest {
        method,
        restricted: reference.restricted,
        counts,
        guesses: GuessCounts {
            singles: options.n_guess_singles,
            doubles: options.n_guess_doubles,
            h: options.n_guess_h,
            p2h: options.n_guess_p2h,
        },
        solver: SolverSettings {
            conv_tol: options.conv_tol,
            max_iter: options.max_iter,
            residual_min_norm: options.residual_min_norm,
            max_subspace: options.max_subspace,
        },
        print_level: options.print_level,
        ground_state_density: options.ground_state_density,
    })
}

/// Reject positive counts belonging to the other method family
fn reject_foreign(family: &str, counts: &[(&'static str, Option<usize>)]) -> Result<(), AdcError> {
    for &(option, value) in counts {
        if value.is_some_and(|n| n > 0) {
            return Err(AdcError::state_request(
                option,
                format!("{option} must not be set for {family} calculations"),
            ));
        }
    }
    Ok(())
}

fn check_pp_counts(
    reference: &ReferenceDescriptor,
    options: &RunOptions,
) -> Result<StateCounts, AdcError> {
    let mut counts = StateCounts::default();

    if reference.is_restricted_singlet() {
        if options.n_states.is_some() {
            return Err(AdcError::state_request(
                "n_states",
                "n_states not allowed for restricted reference, \
                 use n_singlets and n_triplets",
            ));
        }
        if options.n_spin_flip.is_some() {
            return Err(AdcError::state_request(
                "n_spin_flip",
                "n_spin_flip not allowed for restricted reference",
            ));
        }
        counts.singlets = options.n_singlets.unwrap_or(0);
        counts.triplets = options.n_triplets.unwrap_or(0);
    } else {
        for (option, value) in [("n_singlets", options.n_singlets), ("n_triplets", options.n_triplets)]
        {
            if value.is_some() {
                return Err(AdcError::state_request(
                    option,
                    format!(
                        "{option} requires a restricted singlet reference, \
                         use n_states otherwise"
                    ),
                ));
            }
        }

        let n_states = options.n_states.unwrap_or(0);
        if n_states > 0 && options.n_spin_flip.is_some_and(|n| n > 0) {
            return Err(AdcError::state_request(
                "n_spin_flip",
                "only one of n_states and n_spin_flip may be used",
            ));
        }
        match options.n_spin_flip {
            Some(n) => {
                counts.states = n;
                counts.spin_flip = n;
            }
            None => counts.states = n_states,
        }
    }

    if counts.singlets == 0 && counts.triplets == 0 && counts.states == 0 {
        return Err(AdcError::state_request("n_states", "no excited states to compute"));
    }

    reject_foreign(
        "PP-ADC",
        &[("n_ipalpha", options.n_ipalpha), ("n_ipbeta", options.n_ipbeta)],
    )?;
    Ok(counts)
}

fn check_ip_counts(
    reference: &ReferenceDescriptor,
    options: &RunOptions,
) -> Result<StateCounts, AdcError> {
    let mut counts = StateCounts::default();

    if reference.is_restricted_singlet() {
        if options.n_ipalpha.is_some() {
            return Err(AdcError::state_request(
                "n_ipalpha",
                "n_ipalpha requires an unrestricted reference, use n_ipbeta otherwise",
            ));
        }
    } else {
        counts.ipalpha = options.n_ipalpha.unwrap_or(0);
    }
    counts.ipbeta = options.n_ipbeta.unwrap_or(0);

    if counts.ipalpha == 0 && counts.ipbeta == 0 {
        return Err(AdcError::state_request("n_ipbeta", "no ionised states to compute"));
    }

    reject_foreign(
        "IP-ADC",
        &[
            ("n_states", options.n_states),
            ("n_singlets", options.n_singlets),
            ("n_triplets", options.n_triplets),
            ("n_spin_flip", options.n_spin_flip),
        ],
    )?;
    Ok(counts)
}

fn check_core_space(method: &Method, reference: &ReferenceDescriptor) -> Result<(), AdcError> {
    let cvs = method.variants.contains(Variant::Cvs);
    match (cvs, reference.has_core_occupied_space) {
        (true, false) => Err(AdcError::ReferenceMismatch(
            "CVS requires core orbitals".to_string(),
        )),
        (false, true) => Err(AdcError::ReferenceMismatch(
            "core orbitals require CVS".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_pp_reference(
    method: &Method,
    reference: &ReferenceDescriptor,
    counts: &StateCounts,
) -> Result<(), AdcError> {
    if reference.restricted {
        if method.variants.contains(Variant::SpinFlip) {
            return Err(AdcError::state_request(
                "n_spin_flip",
                "spin-flip not allowed for restricted reference",
            ));
        }
        if counts.states > 0 {
            return Err(AdcError::state_request(
                "n_states",
                "n_states not allowed for restricted reference",
            ));
        }
        if counts.singlets == 0 && counts.triplets == 0 {
            return Err(AdcError::state_request(
                "n_singlets",
                "n_singlets + n_triplets must be positive for restricted reference",
            ));
        }
    } else {
        if counts.singlets > 0 || counts.triplets > 0 {
            return Err(AdcError::state_request(
                "n_singlets",
                "n_singlets and n_triplets not allowed for unrestricted reference",
            ));
        }
        if counts.states == 0 {
            return Err(AdcError::state_request(
                "n_states",
                "n_states must be positive for unrestricted reference",
            ));
        }
    }
    Ok(())
}

fn check_ip_reference(
    method: &Method,
    reference: &ReferenceDescriptor,
    counts: &StateCounts,
) -> Result<(), AdcError> {
    if !method.variants.is_empty() {
        return Err(AdcError::Unsupported(format!(
            "IP-ADC has no variants implemented ({method})"
        )));
    }
    if reference.restricted && counts.ipalpha > 0 {
        return Err(AdcError::state_request(
            "n_ipalpha",
            "only beta ionisations are computed for restricted references",
        ));
    }
    Ok(())
}

fn check_ground_state_density(
    method: &Method,
    density: Option<GroundStateDensity>,
) -> Result<(), AdcError> {
    let Some(density) = density else {
        return Ok(());
    };
    if method.level() < 3 {
        return Err(AdcError::Unsupported(format!(
            "ground_state_density = {density} not compatible with {}",
            method.base
        )));
    }
    if density != GroundStateDensity::Mp2 && !method.variants.is_empty() {
        return Err(AdcError::Unsupported(format!(
            "ground_state_density = {density} only works without method variants"
        )));
    }
    Ok(())
}
