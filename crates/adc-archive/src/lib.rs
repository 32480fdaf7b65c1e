//! ADC Archive
//!
//! Slices the output context of an ADC run into a portable archive of
//! named datasets.
//!
//! # Core Operations
//!
//! - **Ground state**: MP energies, dipole, amplitudes and densities
//!   under `mp/`
//! - **Excited states**: per-kind stacked densities, dipoles, energies and
//!   eigenvectors under `adc/<kind>/`
//! - **Index**: `available_kinds`, the kinds actually stored
//!
//! # Architecture
//!
//! ```text
//! method + options → adc_core::run → output context → extract → ArchiveWriter
//! ```
//!
//! # Example
//!
//! ```rust
//! use adc_archive::{extract, ExtractOptions, MemoryArchive, StateKind};
//! use adc_core::Method;
//! use adc_tree::NumericStore;
//!
//! let mut output = NumericStore::new();
//! output.insert("mp2/energy", -0.21);
//!
//! let mut archive = MemoryArchive::new();
//! let kinds = extract(
//!     &output,
//!     &Method::parse("adc2")?,
//!     &[StateKind::Singlet],
//!     &ExtractOptions::default(),
//!     &mut archive,
//! )?;
//!
//! assert!(kinds.is_empty());
//! assert!(archive.contains("mp/mp2/energy"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod archive;
pub mod error;
pub mod extract;

// Re-exports for convenience
pub use archive::{ArchiveWriter, Dataset, DatasetEntry, MemoryArchive, COMPRESSION_LEVEL};
pub use error::ExtractError;
pub use extract::{dump_reference, extract, requested_kinds, ExtractOptions, StateKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the archive
    pub use crate::archive::{ArchiveWriter, MemoryArchive};
    pub use crate::error::ExtractError;
    pub use crate::extract::{dump_reference, extract, ExtractOptions, StateKind};
}
