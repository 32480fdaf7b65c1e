//! Archive abstraction and in-memory implementation
//!
//! An archive is a flat key-value store of named datasets: numeric arrays
//! and string lists. [`ArchiveWriter`] is the seam to a persistent file
//! format; [`MemoryArchive`] keeps everything in memory and serializes
//! through serde.

use crate::error::ExtractError;
use adc_tree::{IntoTreePath, TreePath};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compression level requested for large tensors
pub const COMPRESSION_LEVEL: u8 = 8;

/// Content of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dataset {
    /// Numeric array
    Array(ArrayD<f64>),
    /// Variable-length strings
    Strings(Vec<String>),
}

/// A stored dataset with its requested compression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// Stored data
    pub data: Dataset,
    /// Requested compression level, `None` for uncompressed
    pub compression: Option<u8>,
}

/// Write access to an archive
pub trait ArchiveWriter {
    /// Store a numeric dataset
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DatasetExists`] if `path` is already taken.
    fn write_array(
        &mut self,
        path: &TreePath,
        data: ArrayD<f64>,
        compression: Option<u8>,
    ) -> Result<(), ExtractError>;

    /// Store a string dataset
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DatasetExists`] if `path` is already taken.
    fn write_strings(&mut self, path: &TreePath, data: Vec<String>) -> Result<(), ExtractError>;
}

/// In-memory archive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryArchive {
    datasets: BTreeMap<TreePath, DatasetEntry>,
}

impl MemoryArchive {
    /// Create an empty archive
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset at `path`
    #[must_use]
    pub fn get(&self, path: impl IntoTreePath) -> Option<&DatasetEntry> {
        self.datasets.get(&path.into_tree_path())
    }

    /// Numeric dataset at `path`
    #[must_use]
    pub fn array(&self, path: impl IntoTreePath) -> Option<&ArrayD<f64>> {
        match self.get(path).map(|entry| &entry.data) {
            Some(Dataset::Array(array)) => Some(array),
            _ => None,
        }
    }

    /// String dataset at `path`
    #[must_use]
    pub fn strings(&self, path: impl IntoTreePath) -> Option<&[String]> {
        match self.get(path).map(|entry| &entry.data) {
            Some(Dataset::Strings(strings)) => Some(strings),
            _ => None,
        }
    }

    /// Requested compression of the dataset at `path`
    #[must_use]
    pub fn compression(&self, path: impl IntoTreePath) -> Option<u8> {
        self.get(path).and_then(|entry| entry.compression)
    }

    /// Check whether a dataset exists at `path`
    #[must_use]
    pub fn contains(&self, path: impl IntoTreePath) -> bool {
        self.datasets.contains_key(&path.into_tree_path())
    }

    /// Number of datasets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Check if the archive is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Dataset paths in order
    pub fn paths(&self) -> impl Iterator<Item = &TreePath> {
        self.datasets.keys()
    }

    /// Serialize to JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON
    ///
    /// # Errors
    /// Returns error if the JSON is not an archive
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn insert(&mut self, path: &TreePath, entry: DatasetEntry) -> Result<(), ExtractError> {
        if self.datasets.contains_key(path) {
            return Err(ExtractError::DatasetExists(path.to_string()));
        }
        self.datasets.insert(path.clone(), entry);
        Ok(())
    }
}

impl ArchiveWriter for MemoryArchive {
    fn write_array(
        &mut self,
        path: &TreePath,
        data: ArrayD<f64>,
        compression: Option<u8>,
    ) -> Result<(), ExtractError> {
        self.insert(
            path,
            DatasetEntry {
                data: Dataset::Array(data),
                compression,
            },
        )
    }

    fn write_strings(&mut self, path: &TreePath, data: Vec<String>) -> Result<(), ExtractError> {
        self.insert(
            path,
            DatasetEntry {
                data: Dataset::Strings(data),
                compression: None,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr0, arr1};

    fn path(text: &str) -> TreePath {
        TreePath::normalized(text)
    }

    #[test]
    fn write_and_read() {
        let mut archive = MemoryArchive::new();
        archive
            .write_array(&path("mp/mp2/energy"), arr0(-0.2).into_dyn(), None)
            .unwrap();
        archive
            .write_array(
                &path("mp/mp1/df_o1v1"),
                arr1(&[1.0, 2.0]).into_dyn(),
                Some(COMPRESSION_LEVEL),
            )
            .unwrap();
        archive
            .write_strings(&path("available_kinds"), vec!["singlet".to_string()])
            .unwrap();

        assert_eq!(archive.len(), 3);
        assert_eq!(archive.array("mp/mp2/energy").unwrap().ndim(), 0);
        assert_eq!(archive.compression("mp/mp1/df_o1v1"), Some(8));
        assert_eq!(archive.compression("mp/mp2/energy"), None);
        assert_eq!(archive.strings("available_kinds").unwrap(), ["singlet"]);
        assert!(archive.array("available_kinds").is_none());
    }

    #[test]
    fn duplicate_dataset_rejected() {
        let mut archive = MemoryArchive::new();
        let target = path("adc/singlet/eigenvalues");
        archive.write_array(&target, arr1(&[0.1]).into_dyn(), None).unwrap();
        let err = archive
            .write_array(&target, arr1(&[0.2]).into_dyn(), None)
            .unwrap_err();
        assert!(matches!(err, ExtractError::DatasetExists(_)));
    }

    #[test]
    fn json_round_trip() {
        let mut archive = MemoryArchive::new();
        archive
            .write_array(&path("mp/mp2/dipole"), arr1(&[0.0, 0.0, 0.7]).into_dyn(), None)
            .unwrap();
        archive
            .write_strings(&path("available_kinds"), vec!["state".to_string()])
            .unwrap();

        let restored = MemoryArchive::from_json(&archive.to_json().unwrap()).unwrap();
        assert_eq!(restored, archive);
    }
}
