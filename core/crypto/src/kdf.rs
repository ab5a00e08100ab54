//! Key derivation using PBKDF2-HMAC-SHA512.
//!
//! The master key is derived from the password with a salt that is itself
//! the HMAC of the per-message salt under a fixed application constant, so
//! the constant never seeds PBKDF2 directly. Layer keys are derived from the
//! master key with their own random salts.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use serde::{Deserialize, Serialize};
use sha2::Sha512;

use crate::hash::keyed_hash;
use crate::keys::{LayerKey, LayerSalt, MasterKey, MasterSalt, KEY_LENGTH};
use tricrypt_common::{Error, Result};

/// Application constant used to domain-separate the master salt.
pub const MASTER_SALT_DOMAIN: &[u8] = b"SuperSecureCipherMasterSaltBaseValue!@#$";

/// Iteration counts for the two PBKDF2 stages.
///
/// Every encrypt and decrypt runs one master derivation and three layer
/// derivations, so latency grows linearly with these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// PBKDF2 iterations for password → master key.
    pub master_iterations: u32,
    /// PBKDF2 iterations for master key → layer key.
    pub layer_iterations: u32,
}

impl KdfParams {
    /// Full-strength parameters. Envelopes produced by other implementations
    /// of this format use these counts.
    pub fn standard() -> Self {
        Self {
            master_iterations: 3_000_000,
            layer_iterations: 2_500_000,
        }
    }

    /// Create moderate parameters for slower devices.
    pub fn moderate() -> Self {
        Self {
            master_iterations: 600_000,
            layer_iterations: 500_000,
        }
    }

    /// Create parameters suitable for interactive use.
    pub fn interactive() -> Self {
        Self {
            master_iterations: 100_000,
            layer_iterations: 80_000,
        }
    }

    /// Check that both iteration counts are usable.
    pub fn validate(&self) -> Result<()> {
        if self.master_iterations == 0 || self.layer_iterations == 0 {
            return Err(Error::InvalidInput(
                "KDF iteration counts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// Derive the master key from a password and the per-message salt.
///
/// # Preconditions
/// - `password` must not be empty
/// - `params` must pass [`KdfParams::validate`]
///
/// # Postconditions
/// - The derived key is deterministic given the same inputs
///
/// # Security
/// - Password is not stored or logged
pub fn derive_master_key(
    password: &[u8],
    salt: &MasterSalt,
    params: &KdfParams,
) -> Result<MasterKey> {
    if password.is_empty() {
        return Err(Error::InvalidInput("Password cannot be empty".to_string()));
    }
    params.validate()?;

    let derived_salt = keyed_hash(MASTER_SALT_DOMAIN, salt.as_bytes())?;

    let mut key = MasterKey::from_bytes([0u8; KEY_LENGTH]);
    pbkdf2_sha512(
        password,
        &derived_salt,
        params.master_iterations,
        key.as_bytes_mut(),
    )?;
    Ok(key)
}

/// Derive one cascade layer key from the master key and that layer's salt.
pub fn derive_layer_key(
    master: &MasterKey,
    salt: &LayerSalt,
    params: &KdfParams,
) -> Result<LayerKey> {
    params.validate()?;

    let mut key = LayerKey::from_bytes([0u8; KEY_LENGTH]);
    pbkdf2_sha512(
        master.as_bytes(),
        salt.as_bytes(),
        params.layer_iterations,
        key.as_bytes_mut(),
    )?;
    Ok(key)
}

fn pbkdf2_sha512(secret: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) -> Result<()> {
    pbkdf2::<Hmac<Sha512>>(secret, salt, iterations, out)
        .map_err(|e| Error::Crypto(format!("PBKDF2 failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KdfParams {
        KdfParams {
            master_iterations: 1_000,
            layer_iterations: 500,
        }
    }

    #[test]
    fn test_pbkdf2_sha512_known_answer() {
        // RFC 6070 style vector: P="password", S="salt", c=1.
        let mut out = [0u8; 64];
        pbkdf2_sha512(b"password", b"salt", 1, &mut out).unwrap();
        assert_eq!(&out[..8], &[0x86, 0x7f, 0x70, 0xcf, 0x1a, 0xde, 0x02, 0xcf]);
    }

    #[test]
    fn test_derive_master_key_deterministic() {
        let salt = MasterSalt::from_bytes([42u8; 32]);
        let params = fast_params();

        let key1 = derive_master_key(b"test-password-123", &salt, &params).unwrap();
        let key2 = derive_master_key(b"test-password-123", &salt, &params).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_master_key_different_salt() {
        let params = fast_params();
        let salt1 = MasterSalt::from_bytes([1u8; 32]);
        let salt2 = MasterSalt::from_bytes([2u8; 32]);

        let key1 = derive_master_key(b"password", &salt1, &params).unwrap();
        let key2 = derive_master_key(b"password", &salt2, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_master_key_different_password() {
        let salt = MasterSalt::from_bytes([42u8; 32]);
        let params = fast_params();

        let key1 = derive_master_key(b"password1", &salt, &params).unwrap();
        let key2 = derive_master_key(b"password2", &salt, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_master_salt_is_domain_separated() {
        // The raw salt must not reach PBKDF2 unchanged.
        let salt = MasterSalt::from_bytes([5u8; 32]);
        let params = fast_params();

        let key = derive_master_key(b"pw", &salt, &params).unwrap();
        let mut direct = [0u8; KEY_LENGTH];
        pbkdf2_sha512(b"pw", salt.as_bytes(), params.master_iterations, &mut direct).unwrap();

        assert_ne!(key.as_bytes(), &direct);
    }

    #[test]
    fn test_derive_master_key_empty_password_fails() {
        let salt = MasterSalt::generate();
        assert!(derive_master_key(b"", &salt, &fast_params()).is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let params = KdfParams {
            master_iterations: 0,
            layer_iterations: 1,
        };
        assert!(matches!(params.validate(), Err(Error::InvalidInput(_))));

        let master = MasterKey::from_bytes([1u8; KEY_LENGTH]);
        let params = KdfParams {
            master_iterations: 1,
            layer_iterations: 0,
        };
        assert!(derive_layer_key(&master, &LayerSalt::generate(), &params).is_err());
    }

    #[test]
    fn test_layer_keys_independent() {
        let master = MasterKey::from_bytes([3u8; KEY_LENGTH]);
        let params = fast_params();
        let salt1 = LayerSalt::from_bytes([1u8; 16]);
        let salt2 = LayerSalt::from_bytes([2u8; 16]);

        let k1 = derive_layer_key(&master, &salt1, &params).unwrap();
        let k1_again = derive_layer_key(&master, &salt1, &params).unwrap();
        let k2 = derive_layer_key(&master, &salt2, &params).unwrap();

        assert_eq!(k1.as_bytes(), k1_again.as_bytes());
        assert_ne!(k1.as_bytes(), k2.as_bytes());
        assert_ne!(k1.as_bytes(), master.as_bytes());
    }

    #[test]
    fn test_presets_ordered() {
        let standard = KdfParams::standard();
        assert_eq!(KdfParams::default(), standard);
        assert_eq!(standard.master_iterations, 3_000_000);
        assert_eq!(standard.layer_iterations, 2_500_000);
        assert!(KdfParams::moderate().master_iterations < standard.master_iterations);
        assert!(KdfParams::interactive().master_iterations < KdfParams::moderate().master_iterations);
    }
}
