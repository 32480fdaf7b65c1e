//! Numeric context stores
//!
//! [`NumericStore`] models the adcman context: a path-addressed store of
//! scalars, integer counts, vectors, tensors and strings. It carries the
//! reference data into the solver and the results back out.

use crate::path::{IntoTreePath, TreePath};
use ndarray::{arr0, Array, ArrayD, Dimension, IxDyn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single value in a [`NumericStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoreValue {
    /// Floating-point scalar (energies)
    Scalar(f64),
    /// Integer scalar (state counts)
    Integer(i64),
    /// Short float vector (dipole moments)
    Vector(Vec<f64>),
    /// N-dimensional tensor (density matrices, amplitudes)
    Tensor(ArrayD<f64>),
    /// Text
    Text(String),
}

impl StoreValue {
    /// Kind name used in diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Integer(_) => "integer",
            Self::Vector(_) => "vector",
            Self::Tensor(_) => "tensor",
            Self::Text(_) => "text",
        }
    }

    /// Numeric value as an n-dimensional array
    ///
    /// Scalars become 0-d arrays and vectors 1-d arrays. Text has no array
    /// form.
    #[must_use]
    pub fn to_array(&self) -> Option<ArrayD<f64>> {
        match self {
            Self::Scalar(v) => Some(arr0(*v).into_dyn()),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(v) => Some(arr0(*v as f64).into_dyn()),
            Self::Vector(v) => Array::from_shape_vec(IxDyn(&[v.len()]), v.clone()).ok(),
            Self::Tensor(t) => Some(t.clone()),
            Self::Text(_) => None,
        }
    }

    /// Integer value, if this is an integer
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Vec<f64>> for StoreValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Vector(value)
    }
}

impl<D: Dimension> From<Array<f64, D>> for StoreValue {
    fn from(value: Array<f64, D>) -> Self {
        Self::Tensor(value.into_dyn())
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Path-addressed store of numeric context data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericStore {
    entries: BTreeMap<TreePath, StoreValue>,
}

impl NumericStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous one
    pub fn insert(&mut self, path: impl IntoTreePath, value: impl Into<StoreValue>) {
        self.entries.insert(path.into_tree_path(), value.into());
    }

    /// Value at `path`
    #[must_use]
    pub fn get(&self, path: impl IntoTreePath) -> Option<&StoreValue> {
        self.entries.get(&path.into_tree_path())
    }

    /// Check whether `path` holds a value
    #[must_use]
    pub fn contains(&self, path: impl IntoTreePath) -> bool {
        self.entries.contains_key(&path.into_tree_path())
    }

    /// Value at `path`, failing if absent
    ///
    /// # Errors
    /// Returns [`StoreError::Missing`] if nothing is stored at `path`
    pub fn require(&self, path: impl IntoTreePath) -> Result<&StoreValue, StoreError> {
        let path = path.into_tree_path();
        self.entries
            .get(&path)
            .ok_or_else(|| StoreError::Missing(path.to_string()))
    }

    /// Numeric value at `path` as an array
    ///
    /// # Errors
    /// Returns error if absent or not numeric
    pub fn require_array(&self, path: impl IntoTreePath) -> Result<ArrayD<f64>, StoreError> {
        let path = path.into_tree_path();
        let value = self.require(&path)?;
        value.to_array().ok_or_else(|| StoreError::TypeMismatch {
            path: path.to_string(),
            expected: "numeric",
            actual: value.kind(),
        })
    }

    /// Integer at `path`, or `default` when absent
    ///
    /// # Errors
    /// Returns error if a non-integer value is stored at `path`
    pub fn integer_or(&self, path: impl IntoTreePath, default: i64) -> Result<i64, StoreError> {
        let path = path.into_tree_path();
        match self.entries.get(&path) {
            None => Ok(default),
            Some(value) => value.as_integer().ok_or_else(|| StoreError::TypeMismatch {
                path: path.to_string(),
                expected: "integer",
                actual: value.kind(),
            }),
        }
    }

    /// Copy every entry of `other` into `self`
    pub fn extend_from(&mut self, other: &Self) {
        for (path, value) in &other.entries {
            self.entries.insert(path.clone(), value.clone());
        }
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&TreePath, &StoreValue)> {
        self.entries.iter()
    }
}

/// Errors reading a [`NumericStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing stored at path
    #[error("no value stored at '{0}'")]
    Missing(String),

    /// Stored value has the wrong kind
    #[error("value at '{path}' is {actual}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn insert_and_read_back() {
        let mut store = NumericStore::new();
        store.insert("mp2/energy", -0.25);
        store.insert("adc_pp/adc2s/rhf/singlets/0/nstates", 5_i64);
        store.insert("mp2/prop/dipole", vec![0.0, 0.1, 0.2]);

        assert!(store.contains("/mp2/energy"));
        assert_eq!(
            store.integer_or("adc_pp/adc2s/rhf/singlets/0/nstates", 0).unwrap(),
            5
        );
        assert_eq!(store.require_array("mp2/prop/dipole").unwrap().shape(), &[3]);
        assert_eq!(store.require_array("mp2/energy").unwrap().ndim(), 0);
    }

    #[test]
    fn integer_or_defaults_when_absent() {
        let store = NumericStore::new();
        assert_eq!(store.integer_or("uhf/0/nstates", 0).unwrap(), 0);
    }

    #[test]
    fn integer_or_rejects_wrong_kind() {
        let mut store = NumericStore::new();
        store.insert("uhf/0/nstates", 2.0);
        assert!(matches!(
            store.integer_or("uhf/0/nstates", 0),
            Err(StoreError::TypeMismatch { expected: "integer", .. })
        ));
    }

    #[test]
    fn require_reports_missing_path() {
        let store = NumericStore::new();
        let err = store.require("adc_pp/adc1/uhf/0/es0/u1").unwrap_err();
        assert!(err.to_string().contains("adc_pp/adc1/uhf/0/es0/u1"));
    }

    #[test]
    fn tensors_keep_shape() {
        let mut store = NumericStore::new();
        store.insert("ao/dx_bb", array![[1.0, 0.5], [0.5, 2.0]]);
        let back = store.require_array("ao/dx_bb").unwrap();
        assert_eq!(back.shape(), &[2, 2]);
        assert_eq!(back[[0, 1]], 0.5);
    }

    #[test]
    fn text_has_no_array_form() {
        let mut store = NumericStore::new();
        store.insert("solver", "davidson".to_string());
        assert!(matches!(
            store.require_array("solver"),
            Err(StoreError::TypeMismatch { actual: "text", .. })
        ));
    }
}
