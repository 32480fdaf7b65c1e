//! Content fingerprints for parameter trees
//!
//! Provides [`TreeFingerprint`], a strongly-typed 32-byte Blake3 hash used to
//! compare resolved trees and to identify them in logs.

use std::fmt::{self, Display, Formatter};

/// A 32-byte content fingerprint (Blake3)
///
/// Two trees with the same leaves have the same fingerprint, regardless of
/// the order in which the leaves were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeFingerprint([u8; 32]);

impl TreeFingerprint {
    /// Compute the fingerprint of a sequence of `(path, value)` leaves
    ///
    /// The caller must supply the leaves in a canonical order.
    #[must_use]
    pub fn of_leaves<'a, I>(leaves: I) -> Self
    where
        I: IntoIterator<Item = (String, &'a str)>,
    {
        let mut hasher = blake3::Hasher::new();
        for (path, value) in leaves {
            hasher.update(path.as_bytes());
            hasher.update(&[0]);
            hasher.update(value.as_bytes());
            hasher.update(&[0]);
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for TreeFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
