//! Tree paths for addressing parameter and context nodes
//!
//! Provides [`TreePath`] for slash-delimited hierarchical addressing, the
//! scheme used by adcman for both its parameter tree and its context store.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path within a parameter tree or numeric store
///
/// Segments are never empty and never contain `/`, so the rendered form of
/// any path parses back to the same path.
///
/// # Examples
/// - `adc_pp/adc2s/rhf`
/// - `isr/0-0/tprop`
/// - `prop/.` (the node value of `prop` itself)
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreePath(Vec<String>);

/// Non-empty pieces of `text` between slashes
fn pieces(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split('/')
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
}

impl TreePath {
    /// Build a path from text, dropping empty segments
    ///
    /// `/mp2/energy`, `mp2//energy` and `mp2/energy/` all address the same
    /// node as `mp2/energy`. Use [`FromStr`] to reject such input instead.
    #[must_use]
    pub fn normalized(text: &str) -> Self {
        Self(pieces(text).collect())
    }

    /// Path below the root, see [`TreePath::child`]
    #[inline]
    #[must_use]
    pub fn single(segment: impl AsRef<str>) -> Self {
        Self::normalized(segment.as_ref())
    }

    /// Number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the root path
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Enclosing node, `None` at the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Descend by `segment`
    ///
    /// Slashes inside `segment` descend several levels; empty pieces are
    /// dropped as in [`TreePath::normalized`].
    #[must_use]
    pub fn child(&self, segment: impl AsRef<str>) -> Self {
        let mut path = self.clone();
        path.0.extend(pieces(segment.as_ref()));
        path
    }

    /// Concatenate `other` below this path
    #[must_use]
    pub fn join(&self, other: &Self) -> Self {
        let mut path = self.clone();
        path.0.extend_from_slice(&other.0);
        path
    }

    /// Check if this path equals `other` or encloses it
    ///
    /// `adc_pp/adc2s` is a prefix of `adc_pp/adc2s/rhf` but not of
    /// `adc_pp/adc2x`.
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Remainder of this path below `prefix`
    ///
    /// Returns `None` if `prefix` does not enclose this path, and the root
    /// path if the two are equal.
    #[must_use]
    pub fn strip_prefix(&self, prefix: &Self) -> Option<Self> {
        self.0.strip_prefix(prefix.0.as_slice()).map(|rest| Self(rest.to_vec()))
    }
}

impl Display for TreePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl FromStr for TreePath {
    type Err = PathError;

    /// Strict parse: one leading slash is allowed, empty segments are not
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix('/').unwrap_or(s);
        if body.is_empty() {
            return Ok(Self::default());
        }
        if body.split('/').any(str::is_empty) {
            return Err(PathError::EmptySegment(s.to_string()));
        }
        Ok(Self::normalized(body))
    }
}

impl serde::Serialize for TreePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for TreePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Conversion into a [`TreePath`] for addressing
///
/// Text is converted with [`TreePath::normalized`], so addressing a tree
/// never fails.
pub trait IntoTreePath {
    /// Convert into a tree path
    fn into_tree_path(self) -> TreePath;
}

impl IntoTreePath for TreePath {
    fn into_tree_path(self) -> TreePath {
        self
    }
}

impl IntoTreePath for &TreePath {
    fn into_tree_path(self) -> TreePath {
        self.clone()
    }
}

impl IntoTreePath for &str {
    fn into_tree_path(self) -> TreePath {
        TreePath::normalized(self)
    }
}

impl IntoTreePath for String {
    fn into_tree_path(self) -> TreePath {
        TreePath::normalized(&self)
    }
}

impl IntoTreePath for &String {
    fn into_tree_path(self) -> TreePath {
        TreePath::normalized(self)
    }
}

/// Errors parsing a tree path
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Doubled or trailing slash
    #[error("path '{0}' contains an empty segment")]
    EmptySegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path(text: &str) -> TreePath {
        text.parse().unwrap()
    }

    #[test]
    fn parent_first_last() {
        let p = path("adc_pp/adc2s/rhf");
        assert_eq!(p.parent(), Some(path("adc_pp/adc2s")));
        assert_eq!(p.first(), Some("adc_pp"));
        assert_eq!(p.last(), Some("rhf"));
        assert_eq!(p.len(), 3);

        let root = TreePath::default();
        assert!(root.is_empty());
        assert_eq!(root.parent(), None);
        assert_eq!(root.last(), None);
    }

    #[test]
    fn child_descends_through_slashes() {
        let base = TreePath::single("rhf");
        assert_eq!(base.child("singlets/0").child("nroots"), path("rhf/singlets/0/nroots"));
        assert_eq!(base.child(""), base);
        assert_eq!(base.join(&path("isr/0-0")).to_string(), "rhf/isr/0-0");
    }

    #[test]
    fn prefix_and_strip() {
        let method = path("adc_pp/adc2s");
        let leaf = path("adc_pp/adc2s/rhf/singlets");

        assert!(method.is_prefix_of(&leaf));
        assert!(method.is_prefix_of(&method));
        assert!(!method.is_prefix_of(&path("adc_pp/adc2x")));
        assert!(!leaf.is_prefix_of(&method));

        assert_eq!(leaf.strip_prefix(&method), Some(path("rhf/singlets")));
        assert_eq!(method.strip_prefix(&method), Some(TreePath::default()));
        assert_eq!(method.strip_prefix(&leaf), None);
    }

    #[test]
    fn strict_parse() {
        assert_eq!(path("isr/0-0/tprop/.").len(), 4);
        assert_eq!(path("/mp2/energy"), path("mp2/energy"));
        assert!(path("").is_empty());

        for bad in ["a//b", "a/b/", "//a"] {
            let err = bad.parse::<TreePath>().unwrap_err();
            assert!(matches!(err, PathError::EmptySegment(ref text) if text == bad), "{bad}");
        }
    }

    #[test]
    fn normalized_is_lenient() {
        assert_eq!(TreePath::normalized("/a//b/"), path("a/b"));
        assert!(TreePath::normalized("//").is_empty());
        assert_eq!(TreePath::normalized("state 0/x"), TreePath::single("state 0").child("x"));
    }

    #[test]
    fn rendered_paths_parse_back() {
        for text in ["uhf/0/nroots", "/a//b c/", "prop/.", " x /y"] {
            let p = TreePath::normalized(text);
            assert_eq!(p.to_string().parse::<TreePath>().unwrap(), p, "{text}");

            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(serde_json::from_str::<TreePath>(&json).unwrap(), p, "{text}");
        }
    }
}
