//! Properties of resolution over the whole catalogue

use adc_core::tasks::common::{inflate_guesses, subspace_size};
use adc_core::{
    validate, AdcClass, AdcRequest, BaseMethod, MergePolicy, ReferenceDescriptor, Resolver,
    ResolverConfig, RunOptions, TaskGraph, TaskId,
};
use adc_test_utils::{rhf, rhf_core};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn request(base: BaseMethod, cvs: bool) -> AdcRequest {
    let (method, reference): (String, ReferenceDescriptor) = if cvs {
        (format!("cvs-{base}"), rhf_core())
    } else {
        (base.to_string(), rhf())
    };
    let options = match base.class() {
        AdcClass::Pp => RunOptions::new().with_singlets(2).with_triplets(1),
        AdcClass::Ip => RunOptions::new().with_ipbeta(2),
    };
    validate(&method, &reference, &options).unwrap()
}

fn variants() -> Vec<(BaseMethod, bool)> {
    BaseMethod::ALL
        .into_iter()
        .flat_map(|base| {
            let cvs = base.class() == AdcClass::Pp;
            [(base, false)].into_iter().chain(cvs.then_some((base, true)))
        })
        .collect()
}

#[test]
fn prerequisite_matches_level() {
    let resolver = Resolver::new(ResolverConfig::default()).unwrap();
    for (base, cvs) in variants() {
        let request = request(base, cvs);
        let tree = resolver.resolve(&request).unwrap().tree;
        let root = request.method.tree_root();

        let prereqs: Vec<String> = tree
            .paths()
            .filter(|path| path.parent().as_ref() == Some(&root.child("prereq")))
            .filter_map(|path| path.last().map(str::to_string))
            .filter(|name| name.ends_with("_im"))
            .collect();
        assert_eq!(
            prereqs,
            vec![format!("adc{}_im", base.level())],
            "{}",
            request.method
        );
    }
}

#[test]
fn policies_agree_on_every_method() {
    let strict = Resolver::new(ResolverConfig::default()).unwrap();
    let lenient =
        Resolver::new(ResolverConfig::default().with_merge_policy(MergePolicy::LastWriterWins))
            .unwrap();
    for (base, cvs) in variants() {
        let request = request(base, cvs);
        assert_eq!(
            strict.resolve(&request).unwrap().tree,
            lenient.resolve(&request).unwrap().tree
        );
    }
}

#[test]
fn catalogue_graph_is_acyclic() {
    let graph = TaskGraph::from_catalogue().unwrap();
    for id in TaskId::ALL {
        assert!(graph.closure(id).contains(&TaskId::Hf), "{id} does not reach hf");
    }
}

/// Topological order of the closure of `root`, breaking ties by `priority`
fn order_by_priority(graph: &TaskGraph, root: TaskId, priority: &[u32]) -> Vec<TaskId> {
    let mut pending = graph.closure(root);
    let mut order = Vec::with_capacity(pending.len());
    let mut done = BTreeSet::new();
    while !pending.is_empty() {
        let next = pending
            .iter()
            .copied()
            .filter(|task| graph.dependencies_of(*task).is_subset(&done))
            .min_by_key(|task| priority[*task as usize])
            .unwrap();
        pending.remove(&next);
        done.insert(next);
        order.push(next);
    }
    order
}

fn base_method() -> impl Strategy<Value = BaseMethod> {
    prop::sample::select(BaseMethod::ALL.to_vec())
}

proptest! {
    #[test]
    fn merge_is_order_independent(
        base in base_method(),
        priority in prop::collection::vec(any::<u32>(), TaskId::ALL.len()),
    ) {
        let resolver = Resolver::new(ResolverConfig::default()).unwrap();
        let request = request(base, false);
        let canonical = resolver.resolve(&request).unwrap();

        let root = TaskId::from(base);
        let order = order_by_priority(resolver.graph(), root, &priority);
        let shuffled = resolver.resolve_in_order(&request, &order).unwrap();

        prop_assert_eq!(shuffled.fingerprint(), canonical.fingerprint());
        prop_assert_eq!(shuffled.tree, canonical.tree);
        prop_assert_eq!(shuffled.owners, canonical.owners);
    }

    #[test]
    fn guess_inflation_is_idempotent(primary in 0usize..64, secondary in 0usize..64, n_states in 0usize..64) {
        let once = inflate_guesses(primary, secondary, n_states);
        prop_assert_eq!(inflate_guesses(once, secondary, n_states), once);
        prop_assert!(once + secondary >= n_states);
        prop_assert!(once >= primary);
    }

    #[test]
    fn guess_inflation_handles_any_count(primary in any::<usize>(), secondary in any::<usize>(), n_states in any::<usize>()) {
        let once = inflate_guesses(primary, secondary, n_states);
        prop_assert_eq!(inflate_guesses(once, secondary, n_states), once);
        prop_assert!(once.saturating_add(secondary) >= n_states);
        prop_assert!(once >= primary);
    }

    #[test]
    fn subspace_covers_states(max_subspace in 0usize..128, n_states in 1usize..64) {
        prop_assert!(subspace_size(max_subspace, n_states) >= n_states);
    }

    #[test]
    fn subspace_covers_any_count(max_subspace in any::<usize>(), n_states in any::<usize>()) {
        prop_assert!(subspace_size(max_subspace, n_states) >= n_states);
    }
}
