//! Content hashing primitives
//!
//! Provides [`ContentHash`], the SHA-256 digest of a document's serialized
//! form. Two documents with the same content hash are interchangeable for
//! storage purposes, regardless of where they are stored.

use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};

/// A 32-byte content hash (SHA-256)
///
/// Rendered as a lowercase hex string. Immutable and cheap to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute the SHA-256 digest of arbitrary data
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(digest.into())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }

    /// Full lowercase hex digest
    #[inline]
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
