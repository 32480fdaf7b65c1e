//! Testing utilities for the ADC workspace
//!
//! Shared fixtures, a fake SCF provider and a fake solver that answers a
//! parameter tree with a plausible output context.

#![allow(missing_docs)]

use adc_core::{
    AdcSolver, ContextError, OrbitalSelection, ReferenceDescriptor, ReferenceState, ScfProvider,
    SolverError,
};
use adc_tree::{NumericStore, ParameterTree, TreePath};
use ndarray::{Array, Array2, IxDyn};
use std::cell::RefCell;

/// Occupied orbitals per spin in the fake system
pub const N_OCC: usize = 2;
/// Core orbitals per spin when a core space is selected
pub const N_CORE: usize = 1;
/// Virtual orbitals per spin
pub const N_VIRT: usize = 3;
/// AO basis size
pub const N_BASIS: usize = 5;

/// State blocks the fake solver answers, relative to the method node
pub const STATE_BLOCKS: [&str; 6] = [
    "rhf/singlets/0",
    "rhf/triplets/0",
    "rhf/0",
    "uhf/0",
    "uhf/alphas/0",
    "uhf/betas/0",
];

pub fn rhf() -> ReferenceDescriptor {
    ReferenceDescriptor::restricted_singlet()
}

pub fn uhf() -> ReferenceDescriptor {
    ReferenceDescriptor::unrestricted(2)
}

pub fn rhf_core() -> ReferenceDescriptor {
    ReferenceDescriptor::restricted_singlet().with_core(true)
}

/// Install a test subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn filled(shape: &[usize], seed: f64) -> Array<f64, IxDyn> {
    let mut k = 0.0;
    Array::from_shape_simple_fn(IxDyn(shape), || {
        k += 1.0;
        seed + 0.001 * k
    })
}

/// SCF provider over a fixed reference
///
/// The core-occupied space follows the orbital selection, as a real
/// reference builder would decide it.
#[derive(Debug, Clone)]
pub struct FakeScf {
    pub restricted: bool,
    pub spin_multiplicity: u32,
    pub n_basis: usize,
    pub unavailable: bool,
}

impl FakeScf {
    pub fn restricted() -> Self {
        Self {
            restricted: true,
            spin_multiplicity: 1,
            n_basis: N_BASIS,
            unavailable: false,
        }
    }

    pub fn unrestricted(spin_multiplicity: u32) -> Self {
        Self {
            restricted: false,
            spin_multiplicity,
            ..Self::restricted()
        }
    }

    pub fn with_basis(mut self, n_basis: usize) -> Self {
        self.n_basis = n_basis;
        self
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::restricted()
        }
    }
}

impl ScfProvider for FakeScf {
    fn build_reference(&self, selection: &OrbitalSelection) -> Result<ReferenceState, ContextError> {
        if self.unavailable {
            return Err(ContextError::ScfData("no SCF results".to_string()));
        }
        let descriptor = ReferenceDescriptor {
            restricted: self.restricted,
            spin_multiplicity: self.spin_multiplicity,
            has_core_occupied_space: !selection.core_orbitals.is_empty(),
        };

        let mut context = NumericStore::new();
        context.insert("scf/energy", -76.02);
        context.insert("scf/orben_f", filled(&[self.n_basis], -1.0));
        context.insert("scf/orbcoeff_fb", filled(&[self.n_basis, self.n_basis], 0.0));

        Ok(ReferenceState {
            descriptor,
            nuclear_total_charge: 10.0,
            nuclear_dipole: [0.0, 0.0, 0.7],
            context,
        })
    }

    fn electric_dipole(&self) -> Result<[Array2<f64>; 3], ContextError> {
        let n = self.n_basis;
        Ok([Array2::eye(n), Array2::zeros((n, n)), Array2::eye(n) * 0.5])
    }
}

/// Solver double answering the blocks the parameter tree enables
#[derive(Debug, Default)]
pub struct FakeSolver {
    failure: Option<String>,
    last_params: RefCell<Option<ParameterTree>>,
}

impl FakeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Parameter tree of the most recent run
    pub fn last_params(&self) -> Option<ParameterTree> {
        self.last_params.borrow().clone()
    }
}

impl AdcSolver for FakeSolver {
    fn run(&self, context: &NumericStore, params: &ParameterTree) -> Result<NumericStore, SolverError> {
        *self.last_params.borrow_mut() = Some(params.clone());
        if let Some(message) = &self.failure {
            return Err(SolverError::Failed(message.clone()));
        }
        if !context.contains("ao/nucmm") {
            return Err(SolverError::Failed("input context lacks ao/nucmm".to_string()));
        }

        let mut out = NumericStore::new();
        write_ground_state(&mut out, params);
        for root in ["adc_pp", "adc_ip"] {
            if params.get_or(root, "0") != "1" {
                continue;
            }
            for method in method_nodes(params, root) {
                write_excited_states(&mut out, params, &method);
            }
        }
        Ok(out)
    }
}

fn write_ground_state(out: &mut NumericStore, params: &ParameterTree) {
    let cvs = params.get_or("core", "0") == "1";
    let occ = if cvs { N_OCC - N_CORE } else { N_OCC };

    if params.contains("mp1") {
        out.insert("mp1/t_o1o1v1v1", filled(&[occ, occ, N_VIRT, N_VIRT], 0.01));
        out.insert("mp1/df_o1v1", filled(&[occ, N_VIRT], 0.02));
        if cvs {
            out.insert("mp1/t_o2o2v1v1", filled(&[N_CORE, N_CORE, N_VIRT, N_VIRT], 0.03));
            out.insert("mp1/t_o1o2v1v1", filled(&[occ, N_CORE, N_VIRT, N_VIRT], 0.04));
            out.insert("mp1/df_o2v1", filled(&[N_CORE, N_VIRT], 0.05));
        }
    }
    if params.contains("mp2") {
        out.insert("mp2/energy", -0.21);
        out.insert("mp2/prop/dipole", vec![0.0, 0.0, 0.78]);
        for (block, shape) in [
            ("dm_o1o1", [occ, occ]),
            ("dm_o1v1", [occ, N_VIRT]),
            ("dm_v1v1", [N_VIRT, N_VIRT]),
            ("dm_bb_a", [N_BASIS, N_BASIS]),
            ("dm_bb_b", [N_BASIS, N_BASIS]),
        ] {
            out.insert(format!("mp2/opdm/{block}"), filled(&shape, 0.1));
        }
    }
    if params.contains("mp2/td2") {
        out.insert("mp2/td_o1o1v1v1", filled(&[occ, occ, N_VIRT, N_VIRT], 0.06));
    }
    if params.contains("mp3") {
        out.insert("mp3/energy", -0.005);
    }
}

/// Method nodes enabled below `root` (`adc_pp/adc2s`, ...)
fn method_nodes(params: &ParameterTree, root: &str) -> Vec<TreePath> {
    params
        .iter()
        .filter(|(path, value)| path.len() == 2 && path.first() == Some(root) && *value == "1")
        .map(|(path, _)| path.clone())
        .collect()
}

fn method_level(params: &ParameterTree, method: &TreePath) -> u32 {
    let prereq = method.child("prereq");
    params
        .paths()
        .filter(|path| path.parent().as_ref() == Some(&prereq))
        .filter_map(|path| path.last())
        .filter_map(|name| name.strip_prefix("adc")?.strip_suffix("_im"))
        .find_map(|level| level.parse().ok())
        .unwrap_or(0)
}

fn write_excited_states(out: &mut NumericStore, params: &ParameterTree, method: &TreePath) {
    let level = method_level(params, method);
    for block in STATE_BLOCKS {
        let tree = format!("{method}/{block}");
        let Some(n_states) = params
            .get(format!("{tree}/nroots"))
            .and_then(|n| n.parse::<usize>().ok())
        else {
            continue;
        };

        out.insert(format!("{tree}/nstates"), i64::try_from(n_states).unwrap_or(i64::MAX));
        for i in 0..n_states {
            #[allow(clippy::cast_precision_loss)]
            let shift = i as f64;
            let state = format!("{tree}/es{i}");
            out.insert(format!("{state}/energy"), 0.3 + 0.01 * shift);
            out.insert(format!("{state}/prop/dipole"), vec![0.1, 0.0, shift]);
            out.insert(format!("{state}/tprop/dipole"), vec![0.0, 0.2, shift]);
            for dm in ["opdm", "optdm"] {
                out.insert(format!("{state}/{dm}/dm_bb_a"), filled(&[N_BASIS, N_BASIS], shift));
                out.insert(format!("{state}/{dm}/dm_bb_b"), filled(&[N_BASIS, N_BASIS], -shift));
            }
            out.insert(format!("{state}/u1"), filled(&[N_OCC, N_VIRT], shift));
            if level >= 2 {
                out.insert(
                    format!("{state}/u2"),
                    filled(&[N_OCC, N_OCC, N_VIRT, N_VIRT], shift),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_solver_answers_enabled_blocks() {
        let params: ParameterTree = [
            ("mp1", "1"),
            ("mp2", "1"),
            ("adc_pp", "1"),
            ("adc_pp/adc2s", "1"),
            ("adc_pp/adc2s/prereq/adc2_im", "1"),
            ("adc_pp/adc2s/rhf/singlets/0/nroots", "2"),
        ]
        .into_iter()
        .collect();
        let mut context = NumericStore::new();
        context.insert("ao/nucmm", vec![0.0; 10]);

        let out = FakeSolver::new().run(&context, &params).unwrap();
        assert_eq!(out.integer_or("adc_pp/adc2s/rhf/singlets/0/nstates", 0).unwrap(), 2);
        assert!(out.contains("adc_pp/adc2s/rhf/singlets/0/es1/u2"));
        assert!(!out.contains("adc_pp/adc2s/rhf/triplets/0/nstates"));
        assert!(out.contains("mp2/opdm/dm_bb_a"));
        assert!(!out.contains("mp3/energy"));
    }

    #[test]
    fn first_order_has_no_doubles() {
        let params: ParameterTree = [
            ("adc_pp", "1"),
            ("adc_pp/adc1", "1"),
            ("adc_pp/adc1/prereq/adc1_im", "1"),
            ("adc_pp/adc1/uhf/0/nroots", "1"),
        ]
        .into_iter()
        .collect();
        let mut context = NumericStore::new();
        context.insert("ao/nucmm", vec![0.0; 10]);

        let out = FakeSolver::new().run(&context, &params).unwrap();
        assert!(out.contains("adc_pp/adc1/uhf/0/es0/u1"));
        assert!(!out.contains("adc_pp/adc1/uhf/0/es0/u2"));
    }
}
