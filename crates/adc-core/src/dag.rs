//! Task dependency graph
//!
//! Edges point from a dependency to the task that needs it, so a
//! topological order evaluates prerequisites first.

use crate::error::ResolveError;
use crate::tasks::{catalogue, TaskId};
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::BTreeSet;

/// DAG over the task catalogue
#[derive(Debug, Clone)]
pub struct TaskGraph {
    inner: DiGraphMap<TaskId, ()>,
}

impl TaskGraph {
    /// Build the graph of the static catalogue
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CyclicDependency`] if the catalogue edges
    /// contain a cycle.
    pub fn from_catalogue() -> Result<Self, ResolveError> {
        Self::from_edges(catalogue().iter().map(|task| (task.id, task.dependencies)))
    }

    /// Build a graph from `(task, dependencies)` pairs
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CyclicDependency`] naming a task on the cycle.
    pub fn from_edges<'a, I>(entries: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = (TaskId, &'a [TaskId])>,
    {
        let mut inner = DiGraphMap::new();
        for (task, dependencies) in entries {
            inner.add_node(task);
            for &dependency in dependencies {
                inner.add_edge(dependency, task, ());
            }
        }

        if is_cyclic_directed(&inner) {
            let task = toposort(&inner, None)
                .err()
                .map_or_else(|| "unknown".to_string(), |cycle| cycle.node_id().name().to_string());
            return Err(ResolveError::CyclicDependency { task });
        }
        Ok(Self { inner })
    }

    /// Direct dependencies of `task`
    #[must_use]
    pub fn dependencies_of(&self, task: TaskId) -> BTreeSet<TaskId> {
        self.inner
            .neighbors_directed(task, Direction::Incoming)
            .collect()
    }

    /// `root` and all of its transitive dependencies
    ///
    /// Shared dependencies appear once.
    #[must_use]
    pub fn closure(&self, root: TaskId) -> BTreeSet<TaskId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![root];
        while let Some(task) = stack.pop() {
            if !seen.insert(task) {
                continue;
            }
            stack.extend(self.inner.neighbors_directed(task, Direction::Incoming));
        }
        seen
    }

    /// Evaluation order of the closure of `root`, dependencies first
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::CyclicDependency`] if the graph is cyclic.
    pub fn order(&self, root: TaskId) -> Result<Vec<TaskId>, ResolveError> {
        let closure = self.closure(root);
        let sorted = toposort(&self.inner, None).map_err(|cycle| ResolveError::CyclicDependency {
            task: cycle.node_id().name().to_string(),
        })?;
        Ok(sorted.into_iter().filter(|task| closure.contains(task)).collect())
    }

    /// Check that `order` is a topological order of the closure of `root`
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidOrder`] describing the first violation.
    pub fn check_order(&self, root: TaskId, order: &[TaskId]) -> Result<(), ResolveError> {
        let closure = self.closure(root);
        let given: BTreeSet<TaskId> = order.iter().copied().collect();

        if given.len() != order.len() {
            return Err(ResolveError::InvalidOrder("task listed twice".to_string()));
        }
        if given != closure {
            let missing: Vec<_> = closure.difference(&given).map(|t| t.name()).collect();
            let extra: Vec<_> = given.difference(&closure).map(|t| t.name()).collect();
            return Err(ResolveError::InvalidOrder(format!(
                "closure of '{root}' mismatch (missing: {missing:?}, extra: {extra:?})"
            )));
        }

        let mut done = BTreeSet::new();
        for &task in order {
            if let Some(dependency) = self
                .dependencies_of(task)
                .into_iter()
                .find(|dependency| !done.contains(dependency))
            {
                return Err(ResolveError::InvalidOrder(format!(
                    "'{task}' evaluated before its dependency '{dependency}'"
                )));
            }
            done.insert(task);
        }
        Ok(())
    }
}
