//! Cryptographic primitives for Tricrypt.
//!
//! This module provides:
//! - Password and layer key derivation using PBKDF2-HMAC-SHA512
//! - Authenticated encryption using AES-256-GCM with 16-byte nonces
//! - Keyed (HMAC-SHA512) and unkeyed (SHA-512) hashing
//! - Key types with automatic zeroization
//!
//! # Security Guarantees
//! - All key material is zeroized on drop
//! - No plaintext or key material is ever logged
//! - Constant-time operations for sensitive comparisons
//!
//! Zeroization is best-effort. Copies the compiler or the primitives make
//! of key bytes cannot be tracked and are not guaranteed to be wiped.

pub mod aead;
pub mod hash;
pub mod kdf;
pub mod keys;

pub use aead::{generate_nonce, open, seal, NONCE_SIZE, TAG_SIZE};
pub use hash::{constant_time_eq, hash, keyed_hash, DIGEST_SIZE};
pub use kdf::{derive_layer_key, derive_master_key, KdfParams};
pub use keys::{LayerKey, LayerSalt, MasterKey, MasterSalt};
