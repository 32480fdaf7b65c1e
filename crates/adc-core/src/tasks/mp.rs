//! Ground state tasks: Hartree-Fock properties, Møller-Plesset corrections
//! and their precomputed intermediates

use crate::request::AdcRequest;
use adc_tree::ParameterTree;

fn flags(paths: &[&str]) -> ParameterTree {
    paths.iter().map(|path| (*path, "1")).collect()
}

/// HF state properties
pub(crate) fn hf(_: &AdcRequest) -> ParameterTree {
    let mut params = flags(&["hf/prop", "hf/prop/dipole"]);
    params.set_flag("hf/prop/rsq", false);
    params
}

/// MP1 amplitudes and delta Fock matrix
pub(crate) fn mp1(_: &AdcRequest) -> ParameterTree {
    flags(&["mp1"])
}

/// MP2 energy, density and properties
pub(crate) fn mp2(_: &AdcRequest) -> ParameterTree {
    let mut params = flags(&["mp2", "mp2/opdm", "mp2/prop", "mp2/prop/dipole"]);
    params.set_flag("mp2/prop/rsq", false);
    params
}

/// Pi3, Pi4 and Pi5 intermediates
pub(crate) fn pi_oovv(_: &AdcRequest) -> ParameterTree {
    flags(&["gen_prereq/pi3", "gen_prereq/pi4", "gen_prereq/pi5"])
}

/// Second-order doubles amplitudes
pub(crate) fn mp2td2(_: &AdcRequest) -> ParameterTree {
    flags(&["mp2/td2"])
}

/// MP3 energy
pub(crate) fn mp3(_: &AdcRequest) -> ParameterTree {
    flags(&["mp3"])
}

/// Pia intermediates
pub(crate) fn pia(_: &AdcRequest) -> ParameterTree {
    flags(&["gen_prereq/pia"])
}

/// Pib intermediates
pub(crate) fn pib(_: &AdcRequest) -> ParameterTree {
    flags(&["gen_prereq/pib"])
}
