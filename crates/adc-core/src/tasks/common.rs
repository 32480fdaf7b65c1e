//! Building blocks shared by the PP and IP ADC tasks
//!
//! Every helper writes through a [`Submap`] so that the same block can be
//! placed below `rhf`, `rhf/singlets`, `uhf/alphas`, ...

use crate::method::{AdcClass, Variant, VariantSet};
use crate::request::AdcRequest;
use adc_tree::value::format_float;
use adc_tree::Submap;

/// Single irrep supported by the solver interface
const IRREP: &str = "0";

/// Spin class of a state block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinClass {
    /// Singlet excitations (restricted PP)
    Singlet,
    /// Triplet excitations (restricted PP)
    Triplet,
    /// Excitations of any spin (unrestricted PP)
    Any,
    /// Beta ionisations (restricted IP)
    RestrBeta,
    /// Alpha ionisations (unrestricted IP)
    UnrestrAlpha,
    /// Beta ionisations (unrestricted IP)
    UnrestrBeta,
    /// Singlet-to-triplet couplings (state-to-state only)
    SingletToTriplet,
}

impl SpinClass {
    /// Solver name of the spin class
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singlet => "singlet",
            Self::Triplet => "triplet",
            Self::Any => "any",
            Self::RestrBeta => "restr_beta",
            Self::UnrestrAlpha => "unrestr_alpha",
            Self::UnrestrBeta => "unrestr_beta",
            Self::SingletToTriplet => "s2t",
        }
    }
}

/// Amplitude print threshold for a verbosity level
///
/// Thresholds are checked from the highest level down.
#[must_use]
pub fn amplitude_print_count(print_level: i32) -> u32 {
    const TABLE: [(i32, u32); 3] = [(3, 40), (2, 20), (1, 2)];
    TABLE
        .iter()
        .find(|(min_level, _)| print_level >= *min_level)
        .map_or(60, |&(_, nampl)| nampl)
}

/// Primary guess count after auto-inflation
///
/// If the guesses cannot cover `n_states`, the primary count is raised so
/// that primary + secondary equals `n_states`. Applying this twice gives the
/// same result as applying it once. Counts near `usize::MAX` saturate.
#[inline]
#[must_use]
pub fn inflate_guesses(primary: usize, secondary: usize, n_states: usize) -> usize {
    if primary.saturating_add(secondary) < n_states {
        n_states - secondary
    } else {
        primary
    }
}

/// Davidson subspace size for `n_states`
///
/// Never smaller than `n_states`, saturating at `usize::MAX`.
#[inline]
#[must_use]
pub fn subspace_size(max_subspace: usize, n_states: usize) -> usize {
    if max_subspace == 0 {
        n_states.saturating_mul(5)
    } else if max_subspace < n_states {
        n_states.saturating_mul(2)
    } else {
        max_subspace
    }
}

/// Write the `print` sub-tree
pub fn insert_print_subtree(tadc: &mut Submap<'_>, print_level: i32, variants: &VariantSet) {
    tadc.set("print/print_level", print_level.to_string());
    tadc.set("print/nampl", amplitude_print_count(print_level).to_string());
    tadc.set_flag("print/pcm", false);
    tadc.set_flag("print/cvs", variants.contains(Variant::Cvs));
    tadc.set_flag("print/sf", variants.contains(Variant::SpinFlip));
}

/// Enable irrep `0` below `tspin` and write its state parameters
pub fn add_state_params(
    tspin: &mut Submap<'_>,
    class: AdcClass,
    spin: SpinClass,
    n_states: usize,
    request: &AdcRequest,
) {
    tspin.set_flag(IRREP, true);
    let mut tirrep = tspin.submap(IRREP);
    add_state_irrep_params(&mut tirrep, class, spin, n_states, request);
}

fn add_state_irrep_params(
    tirrep: &mut Submap<'_>,
    class: AdcClass,
    spin: SpinClass,
    n_states: usize,
    request: &AdcRequest,
) {
    tirrep.set("spin", spin.as_str());
    tirrep.set("irrep", IRREP);
    tirrep.set("nroots", n_states.to_string());

    if class == AdcClass::Pp {
        tirrep.set_flag("direct", false);
        tirrep.set_flag("spin_flip", request.has_variant(Variant::SpinFlip));
    }

    tirrep.set_flag("opdm", true);
    let property_blocks: &[&str] = match class {
        AdcClass::Pp => {
            tirrep.set_flag("optdm", true);
            &["prop", "tprop"]
        }
        AdcClass::Ip => &["prop"],
    };
    for block in property_blocks {
        let mut props = tirrep.submap(*block);
        props.set_flag(".", true);
        props.set_flag("dipole", true);
        props.set_flag("rsq", false);
    }

    add_solver_params(tirrep, class, n_states, request);
}

fn add_solver_params(tirrep: &mut Submap<'_>, class: AdcClass, n_states: usize, request: &AdcRequest) {
    let (primary_key, secondary_key) = match class {
        AdcClass::Pp => ("nguess_singles", "nguess_doubles"),
        AdcClass::Ip => ("nguess_h", "nguess_p2h"),
    };
    let (primary, secondary) = request.guesses.for_class(class);
    tirrep.set(
        primary_key,
        inflate_guesses(primary, secondary, n_states).to_string(),
    );
    tirrep.set(secondary_key, secondary.to_string());

    let settings = &request.solver;
    tirrep.set("solver", "davidson");
    tirrep.set("davidson/convergence", format_float(settings.conv_tol));
    tirrep.set("davidson/maxiter", settings.max_iter.to_string());
    tirrep.set("davidson/threshold", format_float(settings.residual_min_norm));
    tirrep.set(
        "davidson/maxsubspace",
        subspace_size(settings.max_subspace, n_states).to_string(),
    );
}

/// Write the state-to-state sub-tree below `tspin`
pub fn add_state2state_params(tspin: &mut Submap<'_>, spin: SpinClass) {
    tspin.set_flag("isr", true);

    let mut tirrep = tspin.submap(format!("isr/{IRREP}-{IRREP}"));
    tirrep.set_flag(".", true);
    tirrep.set_flag("optdm", true);
    tirrep.set_flag("tprop", true);

    if matches!(spin, SpinClass::SingletToTriplet | SpinClass::Any) {
        tirrep.set_flag("tprop/soc", false);
    }
    if spin != SpinClass::SingletToTriplet {
        tirrep.set_flag("tprop/dipole", true);
        tirrep.set_flag("tprop/rsq", false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adc_tree::ParameterTree;

    #[test]
    fn nampl_table() {
        assert_eq!(amplitude_print_count(-1), 60);
        assert_eq!(amplitude_print_count(0), 60);
        assert_eq!(amplitude_print_count(1), 2);
        assert_eq!(amplitude_print_count(2), 20);
        assert_eq!(amplitude_print_count(3), 40);
        assert_eq!(amplitude_print_count(7), 40);
    }

    #[test]
    fn guess_inflation() {
        assert_eq!(inflate_guesses(0, 0, 6), 6);
        assert_eq!(inflate_guesses(2, 1, 6), 5);
        assert_eq!(inflate_guesses(4, 2, 6), 4);
        assert_eq!(inflate_guesses(10, 0, 6), 10);
        assert_eq!(inflate_guesses(0, 8, 6), 0);
        assert_eq!(inflate_guesses(usize::MAX, 1, 6), usize::MAX);
        assert_eq!(inflate_guesses(1, 2, usize::MAX), usize::MAX - 2);
    }

    #[test]
    fn subspace_sizing_boundaries() {
        assert_eq!(subspace_size(0, 4), 20);
        assert_eq!(subspace_size(3, 4), 8);
        assert_eq!(subspace_size(4, 4), 4);
        assert_eq!(subspace_size(60, 4), 60);
        assert_eq!(subspace_size(0, usize::MAX), usize::MAX);
        assert_eq!(subspace_size(3, usize::MAX / 2 + 1), usize::MAX);
    }

    #[test]
    fn print_subtree_flags() {
        let mut tree = ParameterTree::new();
        let variants: VariantSet = [Variant::Cvs].into_iter().collect();
        insert_print_subtree(&mut tree.submap("adc"), 2, &variants);

        assert_eq!(tree.get("adc/print/print_level"), Some("2"));
        assert_eq!(tree.get("adc/print/nampl"), Some("20"));
        assert_eq!(tree.get("adc/print/pcm"), Some("0"));
        assert_eq!(tree.get("adc/print/cvs"), Some("1"));
        assert_eq!(tree.get("adc/print/sf"), Some("0"));
    }

    #[test]
    fn state2state_singlet_to_triplet() {
        let mut tree = ParameterTree::new();
        add_state2state_params(&mut tree.submap("rhf"), SpinClass::SingletToTriplet);

        assert_eq!(tree.get("rhf/isr"), Some("1"));
        assert_eq!(tree.get("rhf/isr/0-0/."), Some("1"));
        assert_eq!(tree.get("rhf/isr/0-0/optdm"), Some("1"));
        assert_eq!(tree.get("rhf/isr/0-0/tprop/soc"), Some("0"));
        assert!(!tree.contains("rhf/isr/0-0/tprop/dipole"));
        assert!(!tree.contains("rhf/isr/0-0/tprop/rsq"));
    }

    #[test]
    fn state2state_singlet() {
        let mut tree = ParameterTree::new();
        add_state2state_params(&mut tree.submap("s"), SpinClass::Singlet);

        assert!(!tree.contains("s/isr/0-0/tprop/soc"));
        assert_eq!(tree.get("s/isr/0-0/tprop/dipole"), Some("1"));
        assert_eq!(tree.get("s/isr/0-0/tprop/rsq"), Some("0"));
    }

    #[test]
    fn state2state_any_has_everything() {
        let mut tree = ParameterTree::new();
        add_state2state_params(&mut tree.submap("uhf"), SpinClass::Any);

        assert_eq!(tree.get("uhf/isr/0-0/tprop/soc"), Some("0"));
        assert_eq!(tree.get("uhf/isr/0-0/tprop/dipole"), Some("1"));
    }
}
