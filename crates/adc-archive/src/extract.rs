//! Extraction of solver output into an archive
//!
//! The output context is sliced into two groups: the ground state (`mp`)
//! and the excited states per kind (`adc/<kind>`), followed by the list of
//! kinds that were stored.

use crate::archive::{ArchiveWriter, COMPRESSION_LEVEL};
use crate::error::ExtractError;
use adc_core::{AdcSolver, BaseMethod, Method, RunOptions, ScfProvider, Variant};
use adc_tree::{NumericStore, TreePath};
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tracing::{debug, info};

/// Uncompressed ground state results: `(output path, archive path)`
const MP_SCALARS: [(&str, &str); 3] = [
    ("mp2/energy", "mp2/energy"),
    ("mp3/energy", "mp3/energy"),
    ("mp2/prop/dipole", "mp2/dipole"),
];

/// Amplitude tensors stored compressed under the same name
const MP_TENSORS: [&str; 6] = [
    "mp1/t_o1o1v1v1",
    "mp1/t_o2o2v1v1",
    "mp1/t_o1o2v1v1",
    "mp1/df_o1v1",
    "mp1/df_o2v1",
    "mp2/td_o1o1v1v1",
];

/// MP2 density blocks, read from `mp2/opdm/<block>`
const MP2_DENSITY_BLOCKS: [&str; 8] = [
    "dm_o1o1", "dm_o1v1", "dm_v1v1", "dm_bb_a", "dm_bb_b", "dm_o2o1", "dm_o2o2", "dm_o2v1",
];

/// Kind of excited states in the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    /// Restricted singlets
    Singlet,
    /// Restricted triplets
    Triplet,
    /// Unrestricted states
    State,
    /// Unrestricted spin-flip states
    SpinFlip,
}

impl StateKind {
    /// All kinds in archive order
    pub const ALL: [Self; 4] = [Self::Singlet, Self::Triplet, Self::State, Self::SpinFlip];

    /// Archive name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singlet => "singlet",
            Self::Triplet => "triplet",
            Self::State => "state",
            Self::SpinFlip => "spin_flip",
        }
    }

    /// Output sub-tree below the method node
    #[must_use]
    pub fn subtree(&self) -> &'static str {
        match self {
            Self::Singlet => "rhf/singlets/0",
            Self::Triplet => "rhf/triplets/0",
            Self::State | Self::SpinFlip => "uhf/0",
        }
    }
}

impl Display for StateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds worth looking for given the run options
///
/// `state` and `spin_flip` share one output tree and are only considered
/// when their count option asks for at least one state.
#[must_use]
pub fn requested_kinds(options: &RunOptions) -> Vec<StateKind> {
    StateKind::ALL
        .into_iter()
        .filter(|kind| match kind {
            StateKind::Singlet | StateKind::Triplet => true,
            StateKind::State => options.n_states.is_some_and(|n| n > 0),
            StateKind::SpinFlip => options.n_spin_flip.is_some_and(|n| n > 0),
        })
        .collect()
}

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Group of the ground state results
    pub mp_tree: String,
    /// Group of the excited state results
    pub adc_tree: String,
    /// States stored in full per kind, all when unset
    pub n_states_full: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mp_tree: "mp".to_string(),
            adc_tree: "adc".to_string(),
            n_states_full: None,
        }
    }
}

impl ExtractOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ground state group
    #[must_use]
    pub fn with_mp_tree(mut self, name: impl Into<String>) -> Self {
        self.mp_tree = name.into();
        self
    }

    /// Set the excited state group
    #[must_use]
    pub fn with_adc_tree(mut self, name: impl Into<String>) -> Self {
        self.adc_tree = name.into();
        self
    }

    /// Limit the states stored in full
    #[must_use]
    pub fn with_n_states_full(mut self, n: usize) -> Self {
        self.n_states_full = Some(n);
        self
    }
}

fn group(name: &str) -> Result<TreePath, ExtractError> {
    let path = TreePath::normalized(name);
    if path.is_empty() {
        return Err(ExtractError::InvalidGroup(name.to_string()));
    }
    Ok(path)
}

/// Extract `output` into `archive`
///
/// Returns the kinds that were stored, in archive order. The same list is
/// written to the `available_kinds` dataset.
///
/// # Errors
///
/// Returns [`ExtractError::Output`] if a state announced by `nstates` lacks
/// data, [`ExtractError::InvalidCount`] if `nstates` is negative,
/// [`ExtractError::Shape`] if per-state arrays disagree in shape, or
/// [`ExtractError::DatasetExists`] if the archive already holds a dataset.
#[tracing::instrument(level = "debug", skip(output, archive, options), fields(method = %method))]
pub fn extract<W: ArchiveWriter + ?Sized>(
    output: &NumericStore,
    method: &Method,
    kinds: &[StateKind],
    options: &ExtractOptions,
    archive: &mut W,
) -> Result<Vec<StateKind>, ExtractError> {
    let mp_group = group(&options.mp_tree)?;
    let adc_group = group(&options.adc_tree)?;

    extract_ground_state(output, method, &mp_group, archive)?;

    let method_tree = method.tree_root();
    let mut available = Vec::new();
    for &kind in kinds {
        let tree = method_tree.join(&TreePath::normalized(kind.subtree()));
        let count_path = tree.child("nstates");
        let count = output.integer_or(&count_path, 0)?;
        let n_states = usize::try_from(count).map_err(|_| ExtractError::InvalidCount {
            path: count_path.to_string(),
            value: count,
        })?;
        if n_states == 0 {
            debug!(%kind, "no states computed");
            continue;
        }
        let n_full = options.n_states_full.map_or(n_states, |n| n.min(n_states));
        extract_kind(output, &tree, n_states, n_full, &adc_group.child(kind.as_str()), archive)?;
        available.push(kind);
    }

    archive.write_strings(
        &TreePath::single("available_kinds"),
        available.iter().map(|kind| kind.as_str().to_string()).collect(),
    )?;
    info!(kinds = ?available, "extracted solver output");
    Ok(available)
}

fn extract_ground_state<W: ArchiveWriter + ?Sized>(
    output: &NumericStore,
    method: &Method,
    group: &TreePath,
    archive: &mut W,
) -> Result<(), ExtractError> {
    // CVS-ADC(3) reports an invalid MP3 energy
    let skip_mp3 = method.base == BaseMethod::Adc3 && method.variants.contains(Variant::Cvs);

    for (source, target) in MP_SCALARS {
        if !output.contains(source) || (skip_mp3 && source == "mp3/energy") {
            continue;
        }
        let data = output.require_array(source)?;
        archive.write_array(&group.join(&TreePath::normalized(target)), data, None)?;
    }

    let tensors = MP_TENSORS.iter().map(|key| ((*key).to_string(), (*key).to_string()));
    let blocks = MP2_DENSITY_BLOCKS
        .iter()
        .map(|block| (format!("mp2/opdm/{block}"), format!("mp2/{block}")));
    for (source, target) in tensors.chain(blocks) {
        if !output.contains(&source) {
            continue;
        }
        let data = output.require_array(&source)?;
        archive.write_array(
            &group.join(&TreePath::normalized(&target)),
            data,
            Some(COMPRESSION_LEVEL),
        )?;
    }
    Ok(())
}

/// Per-state arrays of one kind, collected before stacking
#[derive(Default)]
struct KindData {
    state_dm_a: Vec<ArrayD<f64>>,
    state_dm_b: Vec<ArrayD<f64>>,
    transition_dm_a: Vec<ArrayD<f64>>,
    transition_dm_b: Vec<ArrayD<f64>>,
    state_dipoles: Vec<ArrayD<f64>>,
    transition_dipoles: Vec<ArrayD<f64>>,
    energies: Vec<ArrayD<f64>>,
    singles: Vec<ArrayD<f64>>,
    doubles: Vec<ArrayD<f64>>,
}

fn extract_kind<W: ArchiveWriter + ?Sized>(
    output: &NumericStore,
    tree: &TreePath,
    n_states: usize,
    n_full: usize,
    group: &TreePath,
    archive: &mut W,
) -> Result<(), ExtractError> {
    let mut data = KindData::default();
    let mut all_doubles = true;

    for i in 0..n_states {
        let state = tree.child(format!("es{i}"));
        let at = |rel: &str| state.join(&TreePath::normalized(rel));

        if i < n_full {
            data.state_dm_a.push(output.require_array(at("opdm/dm_bb_a"))?);
            data.state_dm_b.push(output.require_array(at("opdm/dm_bb_b"))?);
            data.transition_dm_a.push(output.require_array(at("optdm/dm_bb_a"))?);
            data.transition_dm_b.push(output.require_array(at("optdm/dm_bb_b"))?);
            data.singles.push(output.require_array(at("u1"))?);
            match output.get(at("u2")) {
                Some(_) if all_doubles => data.doubles.push(output.require_array(at("u2"))?),
                Some(_) => {}
                None => all_doubles = false,
            }
        }
        data.state_dipoles.push(output.require_array(at("prop/dipole"))?);
        data.transition_dipoles.push(output.require_array(at("tprop/dipole"))?);
        data.energies.push(output.require_array(at("energy"))?);
    }

    for (name, arrays) in [
        ("state_diffdm_bb_a", &data.state_dm_a),
        ("state_diffdm_bb_b", &data.state_dm_b),
        ("ground_to_excited_tdm_bb_a", &data.transition_dm_a),
        ("ground_to_excited_tdm_bb_b", &data.transition_dm_b),
        ("state_dipole_moments", &data.state_dipoles),
        ("transition_dipole_moments", &data.transition_dipoles),
        ("eigenvalues", &data.energies),
        ("eigenvectors_singles", &data.singles),
    ] {
        let path = group.child(name);
        archive.write_array(&path, stack(&path, arrays)?, None)?;
    }

    // ADC(0) and ADC(1) have no doubles
    if all_doubles && !data.doubles.is_empty() {
        let path = group.child("eigenvectors_doubles");
        archive.write_array(&path, stack(&path, &data.doubles)?, Some(COMPRESSION_LEVEL))?;
    }
    debug!(%group, n_states, n_full, doubles = all_doubles, "stored kind");
    Ok(())
}

/// Stack per-state arrays along a new leading axis
fn stack(path: &TreePath, arrays: &[ArrayD<f64>]) -> Result<ArrayD<f64>, ExtractError> {
    if arrays.is_empty() {
        return Ok(ArrayD::zeros(IxDyn(&[0])));
    }
    let views: Vec<ArrayViewD<'_, f64>> = arrays.iter().map(ArrayD::view).collect();
    ndarray::stack(Axis(0), &views).map_err(|err| ExtractError::shape(path.to_string(), err))
}

/// Run `method` and extract the output into `archive`
///
/// # Errors
///
/// Returns [`ExtractError::Run`] if the run fails, otherwise any extraction
/// error.
pub fn dump_reference<W: ArchiveWriter + ?Sized>(
    method: &str,
    run_options: &RunOptions,
    scf: &dyn ScfProvider,
    solver: &dyn AdcSolver,
    archive: &mut W,
    options: &ExtractOptions,
) -> Result<Vec<StateKind>, ExtractError> {
    let output = adc_core::run(method, run_options, scf, solver)?;
    let method = Method::parse(method)?;
    extract(&output, &method, &requested_kinds(run_options), options, archive)
}
