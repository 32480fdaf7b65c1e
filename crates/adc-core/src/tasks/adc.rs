//! PP-ADC and IP-ADC tasks
//!
//! Both classes share one block builder; the class decides the tree root,
//! the density prerequisites and the layout of the spin sub-trees.

use super::common::{
    add_state2state_params, add_state_params, insert_print_subtree, SpinClass,
};
use crate::method::{variant_name, AdcClass, BaseMethod};
use crate::options::GroundStateDensity;
use crate::request::AdcRequest;
use adc_tree::{ParameterTree, Submap};

/// Parameter block of the ADC task for `base`
pub(crate) fn parameters(base: BaseMethod, request: &AdcRequest) -> ParameterTree {
    let class = base.class();
    let root = class.tree_root();
    let variant = variant_name(base, &request.method.variants);

    let mut params = ParameterTree::new();
    params.set_flag(root, true);
    params.set_flag(format!("{root}/{variant}"), true);

    let mut tadc = params.submap(format!("{root}/{variant}"));
    insert_print_subtree(&mut tadc, request.print_level, &request.method.variants);

    let level = base.level();
    tadc.set_flag(format!("prereq/adc{level}_im"), true);
    insert_density_prereqs(&mut tadc, class, level, request.density());

    match class {
        AdcClass::Pp => insert_pp_states(&mut tadc, request),
        AdcClass::Ip => insert_ip_states(&mut tadc, request),
    }
    params
}

/// Ground state density prerequisites of the method level
fn insert_density_prereqs(
    tadc: &mut Submap<'_>,
    class: AdcClass,
    level: u8,
    density: GroundStateDensity,
) {
    match class {
        AdcClass::Pp if level >= 3 => {
            let (iterated, third_order) = match density {
                GroundStateDensity::Mp2 => (false, false),
                GroundStateDensity::Mp3 => (false, true),
                GroundStateDensity::Dyson => (true, false),
            };
            tadc.set_flag("prereq/iterated_density", iterated);
            tadc.set_flag("prereq/third_order_density", third_order);
        }
        AdcClass::Pp => {}
        AdcClass::Ip if level >= 3 => {
            let order = match density {
                GroundStateDensity::Mp2 => "2",
                GroundStateDensity::Mp3 => "3",
                GroundStateDensity::Dyson => "3+",
            };
            tadc.set(format!("prereq/adc{level}_etm"), order);
        }
        AdcClass::Ip => tadc.set_flag(format!("prereq/adc{level}_etm"), true),
    }
}

fn insert_pp_states(tadc: &mut Submap<'_>, request: &AdcRequest) {
    let counts = &request.counts;

    if request.restricted {
        tadc.set_flag("rhf", true);
        tadc.set_flag("uhf", false);

        for (key, spin, n_states) in [
            ("rhf/singlets", SpinClass::Singlet, counts.singlets),
            ("rhf/triplets", SpinClass::Triplet, counts.triplets),
        ] {
            tadc.set_flag(key, n_states > 0);
            if n_states > 0 {
                let mut tspin = tadc.submap(key);
                add_state_params(&mut tspin, AdcClass::Pp, spin, n_states, request);
                add_state2state_params(&mut tspin, spin);
            }
        }

        if counts.singlets > 0 && counts.triplets > 0 {
            add_state2state_params(&mut tadc.submap("rhf"), SpinClass::SingletToTriplet);
        }
    } else {
        tadc.set_flag("rhf", false);
        tadc.set_flag("uhf", true);

        let mut tspin = tadc.submap("uhf");
        add_state_params(&mut tspin, AdcClass::Pp, SpinClass::Any, counts.states, request);
        add_state2state_params(&mut tspin, SpinClass::Any);
    }
}

fn insert_ip_states(tadc: &mut Submap<'_>, request: &AdcRequest) {
    let counts = &request.counts;

    if request.restricted {
        tadc.set_flag("rhf", true);
        tadc.set_flag("uhf", false);

        let mut tspin = tadc.submap("rhf");
        add_state_params(&mut tspin, AdcClass::Ip, SpinClass::RestrBeta, counts.ipbeta, request);
        add_state2state_params(&mut tspin, SpinClass::RestrBeta);
    } else {
        tadc.set_flag("rhf", false);
        tadc.set_flag("uhf", true);

        for (key, spin, n_states) in [
            ("uhf/alphas", SpinClass::UnrestrAlpha, counts.ipalpha),
            ("uhf/betas", SpinClass::UnrestrBeta, counts.ipbeta),
        ] {
            if n_states > 0 {
                tadc.set_flag(key, true);
                let mut tspin = tadc.submap(key);
                add_state_params(&mut tspin, AdcClass::Ip, spin, n_states, request);
                add_state2state_params(&mut tspin, spin);
            }
        }
    }
}
