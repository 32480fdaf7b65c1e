//! Resolver: walk the task DAG for a request and merge the contributions
//!
//! Every task in the closure of the requested method contributes once.
//! Contributions are composed through the configured merge strategy, so a
//! disagreement between two tasks surfaces as a conflict under the default
//! strict policy.

use crate::dag::TaskGraph;
use crate::error::ResolveError;
use crate::method::Variant;
use crate::request::AdcRequest;
use crate::tasks::TaskId;
use adc_merge::{Contribution, MergePolicy};
use adc_tree::{ParameterTree, TreeFingerprint, TreePath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Source name of the keys written after all tasks
pub const TOPLEVEL_SOURCE: &str = "toplevel";

/// Resolver configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Collision handling between task contributions
    pub merge_policy: MergePolicy,
}

impl ResolverConfig {
    /// Select the merge policy
    #[must_use]
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }
}

/// Merged parameters of one request
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The merged tree handed to the solver
    pub tree: ParameterTree,
    /// Contributing source of every leaf
    pub owners: BTreeMap<TreePath, String>,
    /// Tasks in evaluation order
    pub order: Vec<TaskId>,
}

impl Resolution {
    /// Content fingerprint of the merged tree
    #[inline]
    #[must_use]
    pub fn fingerprint(&self) -> TreeFingerprint {
        self.tree.fingerprint()
    }

    /// Source that wrote `path`
    #[must_use]
    pub fn owner(&self, path: &TreePath) -> Option<&str> {
        self.owners.get(path).map(String::as_str)
    }
}

/// Resolves validated requests into parameter trees
#[derive(Debug, Clone)]
pub struct Resolver {
    config: ResolverConfig,
    graph: TaskGraph,
}

impl Resolver {
    /// Create a resolver over the task catalogue
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CyclicDependency`] if the catalogue is cyclic.
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        Ok(Self {
            config,
            graph: TaskGraph::from_catalogue()?,
        })
    }

    /// Current configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Task graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Resolve `request` in the canonical topological order
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Merge`] if two tasks disagree on a leaf under
    /// the strict policy.
    pub fn resolve(&self, request: &AdcRequest) -> Result<Resolution, ResolveError> {
        let root = TaskId::from(request.method.base);
        let order = self.graph.order(root)?;
        self.resolve_in_order(request, &order)
    }

    /// Resolve `request` evaluating tasks in `order`
    ///
    /// `order` must be a topological order of the closure of the method task.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidOrder`] for an order that is not a
    /// topological order of the closure, or [`ResolveError::Merge`] on
    /// conflicting contributions.
    #[tracing::instrument(level = "debug", skip(self, request), fields(method = %request.method))]
    pub fn resolve_in_order(
        &self,
        request: &AdcRequest,
        order: &[TaskId],
    ) -> Result<Resolution, ResolveError> {
        let root = TaskId::from(request.method.base);
        self.graph.check_order(root, order)?;

        let mut contributions: Vec<Contribution> = order
            .iter()
            .map(|&id| {
                let tree = id.task().parameters(request);
                debug!(task = id.name(), leaves = tree.len(), "task contributed");
                Contribution::new(id.name(), tree)
            })
            .collect();
        contributions.push(Contribution::new(TOPLEVEL_SOURCE, toplevel_parameters(request)));

        let strategy = self.config.merge_policy.strategy();
        let composition = strategy.compose(&contributions)?;

        let resolution = Resolution {
            tree: composition.tree,
            owners: composition.owners,
            order: order.to_vec(),
        };
        info!(
            method = %request.method,
            strategy = strategy.name(),
            tasks = resolution.order.len(),
            leaves = resolution.tree.len(),
            fingerprint = %resolution.fingerprint().short(),
            "resolved parameter tree"
        );
        Ok(resolution)
    }
}

/// Keys written after all tasks
fn toplevel_parameters(request: &AdcRequest) -> ParameterTree {
    let mut params = ParameterTree::new();
    params.set("print_level", request.print_level.to_string());
    if request.has_variant(Variant::Cvs) {
        params.set_flag("core", true);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RunOptions;
    use crate::reference::ReferenceDescriptor;
    use crate::validation::validate;

    fn request(method: &str, options: &RunOptions) -> AdcRequest {
        validate(method, &ReferenceDescriptor::restricted_singlet(), options).unwrap()
    }

    #[test]
    fn resolves_adc1() {
        let resolver = Resolver::new(ResolverConfig::default()).unwrap();
        let request = request("adc1", &RunOptions::new().with_singlets(2));
        let resolution = resolver.resolve(&request).unwrap();

        assert_eq!(resolution.order, vec![TaskId::Hf, TaskId::Mp1, TaskId::Adc1]);
        assert_eq!(resolution.tree.get("mp1"), Some("1"));
        assert_eq!(resolution.tree.get("adc_pp/adc1"), Some("1"));
        assert_eq!(resolution.tree.get("print_level"), Some("1"));
        assert!(!resolution.tree.contains("core"));
    }

    #[test]
    fn owners_track_tasks() {
        let resolver = Resolver::new(ResolverConfig::default()).unwrap();
        let request = request("adc2", &RunOptions::new().with_singlets(1));
        let resolution = resolver.resolve(&request).unwrap();

        assert_eq!(resolution.owner(&"mp2/td2".parse().unwrap()), Some("mp2td2"));
        assert_eq!(resolution.owner(&"hf/prop".parse().unwrap()), Some("hf"));
        assert_eq!(
            resolution.owner(&"print_level".parse().unwrap()),
            Some(TOPLEVEL_SOURCE)
        );
    }

    #[test]
    fn rejects_foreign_order() {
        let resolver = Resolver::new(ResolverConfig::default()).unwrap();
        let request = request("adc1", &RunOptions::new().with_singlets(2));
        let err = resolver
            .resolve_in_order(&request, &[TaskId::Hf, TaskId::Adc1])
            .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidOrder(_)));
    }

    #[test]
    fn policies_agree_on_catalogue() {
        let strict = Resolver::new(ResolverConfig::default()).unwrap();
        let lenient = Resolver::new(
            ResolverConfig::default().with_merge_policy(MergePolicy::LastWriterWins),
        )
        .unwrap();
        let request = request("adc3", &RunOptions::new().with_singlets(2).with_triplets(1));

        assert_eq!(
            strict.resolve(&request).unwrap().tree,
            lenient.resolve(&request).unwrap().tree
        );
    }

    #[test]
    fn config_from_json() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{"merge_policy":"last_writer_wins"}"#).unwrap();
        assert_eq!(config.merge_policy, MergePolicy::LastWriterWins);
        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.merge_policy, MergePolicy::Strict);
    }
}
