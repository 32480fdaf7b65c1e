//! Parameter trees
//!
//! [`ParameterTree`] is the string-valued, path-addressed configuration
//! consumed by adcman. [`Submap`] is a write cursor rooted at a sub-path.

use crate::hash::TreeFingerprint;
use crate::path::{IntoTreePath, TreePath};
use crate::value::flag;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Hierarchical mapping from tree paths to string values
///
/// Every leaf path holds exactly one value. Writing a path twice keeps the
/// last value; collision checks between independent trees are done with
/// [`ParameterTree::conflicts_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTree {
    entries: BTreeMap<TreePath, String>,
}

impl ParameterTree {
    /// Create an empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at `path`, replacing any previous value
    pub fn set(&mut self, path: impl IntoTreePath, value: impl Into<String>) {
        self.entries.insert(path.into_tree_path(), value.into());
    }

    /// Store a boolean flag (`"1"`/`"0"`) at `path`
    pub fn set_flag(&mut self, path: impl IntoTreePath, on: bool) {
        self.set(path, flag(on));
    }

    /// Value stored at `path`
    #[must_use]
    pub fn get(&self, path: impl IntoTreePath) -> Option<&str> {
        self.entries.get(&path.into_tree_path()).map(String::as_str)
    }

    /// Value stored at `path`, or `default`
    #[must_use]
    pub fn get_or<'a>(&'a self, path: impl IntoTreePath, default: &'a str) -> &'a str {
        self.get(path).unwrap_or(default)
    }

    /// Check whether `path` holds a value
    #[must_use]
    pub fn contains(&self, path: impl IntoTreePath) -> bool {
        self.entries.contains_key(&path.into_tree_path())
    }

    /// Write cursor whose paths are offset by `prefix`
    pub fn submap(&mut self, prefix: impl IntoTreePath) -> Submap<'_> {
        Submap {
            tree: self,
            prefix: prefix.into_tree_path(),
        }
    }

    /// Owned copy of everything below `prefix`, re-rooted at `prefix`
    ///
    /// A value stored at `prefix` itself is not part of the subtree.
    #[must_use]
    pub fn subtree(&self, prefix: impl IntoTreePath) -> Self {
        let prefix = prefix.into_tree_path();
        let entries = self
            .entries
            .range(prefix.clone()..)
            .take_while(|(path, _)| prefix.is_prefix_of(path))
            .filter_map(|(path, value)| {
                path.strip_prefix(&prefix)
                    .filter(|rel| !rel.is_empty())
                    .map(|rel| (rel, value.clone()))
            })
            .collect();
        Self { entries }
    }

    /// Copy every leaf of `other` into `self`; values from `other` win
    pub fn merge(&mut self, other: &Self) {
        for (path, value) in &other.entries {
            self.entries.insert(path.clone(), value.clone());
        }
    }

    /// Leaves present in both trees with different values
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> Vec<PathConflict> {
        other
            .entries
            .iter()
            .filter_map(|(path, incoming)| match self.entries.get(path) {
                Some(existing) if existing != incoming => Some(PathConflict {
                    path: path.clone(),
                    existing: existing.clone(),
                    incoming: incoming.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Number of leaves
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the tree has no leaves
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate leaves in path order
    pub fn iter(&self) -> impl Iterator<Item = (&TreePath, &str)> {
        self.entries.iter().map(|(p, v)| (p, v.as_str()))
    }

    /// Iterate leaf paths in order
    pub fn paths(&self) -> impl Iterator<Item = &TreePath> {
        self.entries.keys()
    }

    /// Order-independent content fingerprint
    #[must_use]
    pub fn fingerprint(&self) -> TreeFingerprint {
        TreeFingerprint::of_leaves(
            self.entries
                .iter()
                .map(|(path, value)| (path.to_string(), value.as_str())),
        )
    }

    /// Render as a flat JSON object of `path -> value`
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a flat JSON object of `path -> value`
    ///
    /// # Errors
    /// Returns error on malformed JSON or invalid paths
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<P: IntoTreePath, V: Into<String>> FromIterator<(P, V)> for ParameterTree {
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (path, value) in iter {
            tree.set(path, value);
        }
        tree
    }
}

impl IntoIterator for ParameterTree {
    type Item = (TreePath, String);
    type IntoIter = btree_map::IntoIter<TreePath, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Write cursor into a [`ParameterTree`]
///
/// All paths passed to a submap are resolved relative to its prefix and
/// written straight into the parent tree.
#[derive(Debug)]
pub struct Submap<'a> {
    tree: &'a mut ParameterTree,
    prefix: TreePath,
}

impl Submap<'_> {
    /// Prefix of this cursor within the parent tree
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &TreePath {
        &self.prefix
    }

    /// Store `value` at `prefix/path`
    pub fn set(&mut self, path: impl IntoTreePath, value: impl Into<String>) {
        let full = self.prefix.join(&path.into_tree_path());
        self.tree.set(full, value);
    }

    /// Store a boolean flag at `prefix/path`
    pub fn set_flag(&mut self, path: impl IntoTreePath, on: bool) {
        self.set(path, flag(on));
    }

    /// Value stored at `prefix/path`
    #[must_use]
    pub fn get(&self, path: impl IntoTreePath) -> Option<&str> {
        self.tree.get(self.prefix.join(&path.into_tree_path()))
    }

    /// Check whether `prefix/path` holds a value
    #[must_use]
    pub fn contains(&self, path: impl IntoTreePath) -> bool {
        self.tree.contains(self.prefix.join(&path.into_tree_path()))
    }

    /// Nested cursor at `prefix/path`
    pub fn submap(&mut self, path: impl IntoTreePath) -> Submap<'_> {
        let prefix = self.prefix.join(&path.into_tree_path());
        Submap {
            tree: &mut *self.tree,
            prefix,
        }
    }
}

/// A leaf on which two trees disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConflict {
    /// Conflicting leaf
    pub path: TreePath,
    /// Value already present
    pub existing: String,
    /// Value that would replace it
    pub incoming: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_get_contains() {
        let mut tree = ParameterTree::new();
        tree.set("mp1", "1");
        assert_eq!(tree.get("mp1"), Some("1"));
        assert!(tree.contains("mp1"));
        assert!(!tree.contains("mp2"));
        assert_eq!(tree.get_or("mp2", "0"), "0");
    }

    #[test]
    fn set_is_last_write_wins() {
        let mut tree = ParameterTree::new();
        tree.set("nguess_singles", "0");
        tree.set("nguess_singles", "6");
        assert_eq!(tree.get("nguess_singles"), Some("6"));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn leading_slash_addresses_same_leaf() {
        let mut tree = ParameterTree::new();
        tree.set("/mp2/energy", "x");
        assert_eq!(tree.get("mp2/energy"), Some("x"));
    }

    #[test]
    fn submap_rewrites_to_parent() {
        let mut tree = ParameterTree::new();
        {
            let mut adc = tree.submap("adc_pp/adc2s");
            adc.set("rhf", "1");
            let mut singlets = adc.submap("rhf/singlets");
            singlets.set("0/nroots", "5");
            assert_eq!(singlets.get("0/nroots"), Some("5"));
            assert_eq!(singlets.prefix().to_string(), "adc_pp/adc2s/rhf/singlets");
        }
        assert_eq!(tree.get("adc_pp/adc2s/rhf"), Some("1"));
        assert_eq!(tree.get("adc_pp/adc2s/rhf/singlets/0/nroots"), Some("5"));
    }

    #[test]
    fn subtree_reroots() {
        let mut tree = ParameterTree::new();
        tree.set("uhf", "1");
        tree.set("uhf/0", "1");
        tree.set("uhf/0/nroots", "4");
        tree.set("uhfx/0", "1");

        let sub = tree.subtree("uhf");
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.get("0"), Some("1"));
        assert_eq!(sub.get("0/nroots"), Some("4"));
    }

    #[test]
    fn merge_overwrites() {
        let mut a: ParameterTree = [("mp1", "1"), ("x", "a")].into_iter().collect();
        let b: ParameterTree = [("x", "b"), ("mp2", "1")].into_iter().collect();
        a.merge(&b);
        assert_eq!(a.get("x"), Some("b"));
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn conflicts_ignore_equal_values() {
        let a: ParameterTree = [("mp1", "1"), ("x", "a")].into_iter().collect();
        let b: ParameterTree = [("mp1", "1"), ("x", "b")].into_iter().collect();
        let conflicts = a.conflicts_with(&b);
        assert_eq!(
            conflicts,
            vec![PathConflict {
                path: TreePath::single("x"),
                existing: "a".to_string(),
                incoming: "b".to_string(),
            }]
        );
    }

    #[test]
    fn fingerprint_is_write_order_independent() {
        let mut a = ParameterTree::new();
        a.set("hf/prop", "1");
        a.set("mp1", "1");
        let mut b = ParameterTree::new();
        b.set("mp1", "1");
        b.set("hf/prop", "1");
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.set("mp1", "0");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn json_round_trip() {
        let tree: ParameterTree = [("adc_pp", "1"), ("adc_pp/adc2s/print/nampl", "20")]
            .into_iter()
            .collect();
        let json = tree.to_json().unwrap();
        assert!(json.contains("\"adc_pp/adc2s/print/nampl\": \"20\""));
        assert_eq!(ParameterTree::from_json(&json).unwrap(), tree);
    }

    #[test]
    fn json_round_trip_keeps_untidy_paths() {
        let mut tree = ParameterTree::new();
        tree.set("custom/state 0//nroots/", "2");
        tree.submap("isr ").set_flag(" 0-0 /.", true);

        let json = tree.to_json().unwrap();
        assert_eq!(ParameterTree::from_json(&json).unwrap(), tree);
        assert_eq!(tree.get("custom/state 0/nroots"), Some("2"));
    }

    #[test]
    fn from_json_rejects_empty_segments() {
        assert!(ParameterTree::from_json(r#"{"a//b": "1"}"#).is_err());
    }
}
