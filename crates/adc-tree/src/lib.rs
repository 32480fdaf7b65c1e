//! ADC Parameter Trees
//!
//! Path-addressed data structures shared by the parameter resolver, the
//! solver boundary and the reference-data extraction.
//!
//! # Core Concepts
//!
//! - [`TreePath`]: Slash-delimited hierarchical addressing (`adc_pp/adc2s/rhf`)
//! - [`ParameterTree`]: String-valued configuration tree consumed by adcman
//! - [`Submap`]: Write cursor rooted at a sub-path of a tree
//! - [`NumericStore`]: Context store of scalars, vectors and tensors
//! - [`TreeFingerprint`]: 32-byte Blake3 fingerprint of a resolved tree
//! - [`value`]: Textual encoding of flags and floats
//!
//! # Example
//!
//! ```rust
//! use adc_tree::{ParameterTree, value::format_float};
//!
//! let mut params = ParameterTree::new();
//! let mut adc = params.submap("adc_pp/adc2s");
//! adc.set("davidson/convergence", format_float(1e-6));
//! adc.set_flag("rhf", true);
//!
//! assert_eq!(params.get("adc_pp/adc2s/davidson/convergence"), Some("1e-06"));
//! assert_eq!(params.get("adc_pp/adc2s/rhf"), Some("1"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod hash;
mod path;
mod store;
mod tree;

/// Textual value encoding
pub mod value;

// Re-exports
pub use hash::TreeFingerprint;
pub use path::{IntoTreePath, PathError, TreePath};
pub use store::{NumericStore, StoreError, StoreValue};
pub use tree::{ParameterTree, PathConflict, Submap};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn submap_writes_fingerprint_like_direct_writes() {
        let mut direct = ParameterTree::new();
        direct.set("adc_pp/adc1/uhf/0/nroots", "4");
        direct.set("adc_pp/adc1/uhf/0/spin", "any");

        let mut nested = ParameterTree::new();
        {
            let mut uhf = nested.submap("adc_pp/adc1/uhf");
            let mut state = uhf.submap("0");
            state.set("spin", "any");
            state.set("nroots", "4");
        }

        assert_eq!(direct, nested);
        assert_eq!(direct.fingerprint(), nested.fingerprint());
    }

    #[test]
    fn tree_and_store_share_addressing() {
        let path: TreePath = "adc_pp/adc2s/rhf/singlets/0/es0/energy".parse().unwrap();

        let mut store = NumericStore::new();
        store.insert(&path, -0.5);
        assert!(store.contains("/adc_pp/adc2s/rhf/singlets/0/es0/energy"));

        let mut tree = ParameterTree::new();
        tree.set(&path, value::format_float(-0.5));
        assert_eq!(tree.get(path.to_string()), Some("-0.5"));
    }
}
