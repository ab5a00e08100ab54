//! Envelope engine for Tricrypt.
//!
//! This module provides:
//! - The three-layer AES-256-GCM cascade
//! - Password authentication and plaintext integrity verification
//! - The dot-separated base64 envelope codec
//! - The `SecureCipher` orchestrator exposing `encrypt` and `decrypt`
//!
//! # Architecture
//! `SecureCipher` derives the master key, hands it to the verifier and the
//! cascade, and serializes the result with the envelope codec. Every call
//! owns its key material and drops (zeroizes) it before returning.

pub mod cascade;
pub mod cipher;
pub mod compress;
pub mod config;
pub mod envelope;
pub mod verifier;

pub use cascade::{LayerParams, LAYER_COUNT};
pub use cipher::{decrypt, encrypt, SecureCipher};
pub use config::CipherConfig;
pub use envelope::{Envelope, SEGMENT_COUNT};
