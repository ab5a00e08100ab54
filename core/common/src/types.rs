//! Common types used throughout Tricrypt.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sensitive data wrapper that zeroizes on drop.
///
/// Wiping is best-effort: copies made earlier by the allocator or by a
/// primitive are out of reach.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SensitiveBytes(Vec<u8>);

impl SensitiveBytes {
    /// Create new sensitive bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    /// Get a reference to the inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SensitiveBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensitiveBytes([REDACTED; {} bytes])", self.0.len())
    }
}
