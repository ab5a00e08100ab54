//! SHA-512 hashing, HMAC-SHA512, and constant-time comparison.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use tricrypt_common::{Error, Result};

/// Output size of SHA-512 and HMAC-SHA512 in bytes.
pub const DIGEST_SIZE: usize = 64;

type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 of `message` under `key`.
pub fn keyed_hash(key: &[u8], message: &[u8]) -> Result<[u8; DIGEST_SIZE]> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| Error::Crypto(format!("HMAC init failed: {}", e)))?;
    mac.update(message);

    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// SHA-512 of `message`.
pub fn hash(message: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&Sha512::digest(message));
    out
}

/// Compare two byte strings without data-dependent timing.
///
/// Slices of different lengths compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
