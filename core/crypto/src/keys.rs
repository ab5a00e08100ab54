//! Key types with secure memory handling.
//!
//! All key types automatically zeroize their memory on drop to prevent
//! sensitive data from persisting in memory.

use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of encryption keys in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// Length of the per-message master salt in bytes.
pub const MASTER_SALT_LENGTH: usize = 32;

/// Length of each per-layer salt in bytes.
pub const LAYER_SALT_LENGTH: usize = 16;

/// Master key derived from the user password.
///
/// This key is the root of the per-message key hierarchy. It authenticates
/// the password and seeds the three layer keys, and is never used for AEAD
/// directly.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Create a master key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    ///
    /// # Security
    /// The returned slice should be used immediately and not stored.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8; KEY_LENGTH] {
        &mut self.key
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey([REDACTED])")
    }
}

/// Key for one layer of the encryption cascade.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LayerKey {
    key: [u8; KEY_LENGTH],
}

impl LayerKey {
    /// Create a layer key from raw bytes.
    pub fn from_bytes(key: [u8; KEY_LENGTH]) -> Self {
        Self { key }
    }

    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8; KEY_LENGTH] {
        &mut self.key
    }
}

impl fmt::Debug for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerKey([REDACTED])")
    }
}

/// Salt for master key derivation. Unique per message, stored in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterSalt([u8; MASTER_SALT_LENGTH]);

impl MasterSalt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        let mut salt = [0u8; MASTER_SALT_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; MASTER_SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; MASTER_SALT_LENGTH] {
        &self.0
    }
}

/// Salt for one layer key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSalt([u8; LAYER_SALT_LENGTH]);

impl LayerSalt {
    /// Generate a random salt.
    pub fn generate() -> Self {
        let mut salt = [0u8; LAYER_SALT_LENGTH];
        rand::rngs::OsRng.fill_bytes(&mut salt);
        Self(salt)
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; LAYER_SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the salt bytes.
    pub fn as_bytes(&self) -> &[u8; LAYER_SALT_LENGTH] {
        &self.0
    }
}
