//! Password authentication and plaintext integrity.
//!
//! The innermost cascade input is laid out as
//!
//! ```text
//! [ password auth value: 64 ][ plaintext SHA-512: 64 ][ zlib payload ]
//! ```
//!
//! The auth value is HMAC-SHA512 of a fixed label under the master key. It
//! lets decryption reject a wrong password with a stable error before the
//! payload is inflated.

use zeroize::Zeroizing;

use crate::compress::{compress, decompress};
use crate::config::CipherConfig;
use tricrypt_common::{DecryptError, Result, SensitiveBytes};
use tricrypt_crypto::{constant_time_eq, hash, keyed_hash, MasterKey, DIGEST_SIZE};

/// Label authenticated under the master key.
pub const PASSWORD_AUTH_LABEL: &[u8] = b"PASSWORD_AUTHENTICATION";

/// Bytes preceding the compressed payload.
pub const HEADER_PREFIX_LEN: usize = 2 * DIGEST_SIZE;

/// Compute the password authentication value for `master`.
pub fn password_auth_value(master: &MasterKey) -> Result<[u8; DIGEST_SIZE]> {
    keyed_hash(master.as_bytes(), PASSWORD_AUTH_LABEL)
}

/// Build the cascade input for `plaintext`.
pub fn build_header(
    master: &MasterKey,
    plaintext: &[u8],
    config: &CipherConfig,
) -> Result<Zeroizing<Vec<u8>>> {
    let auth = Zeroizing::new(password_auth_value(master)?);
    let integrity = hash(plaintext);
    let payload = compress(plaintext, config.compression_level)?;

    let mut header = Zeroizing::new(Vec::with_capacity(HEADER_PREFIX_LEN + payload.len()));
    header.extend_from_slice(auth.as_slice());
    header.extend_from_slice(&integrity);
    header.extend_from_slice(&payload);
    Ok(header)
}

/// Check a recovered header and return the plaintext bytes.
///
/// The password check runs first; on mismatch nothing is inflated. The
/// integrity hash is checked over the inflated bytes.
pub fn open_header(
    master: &MasterKey,
    header: &SensitiveBytes,
) -> std::result::Result<Zeroizing<Vec<u8>>, DecryptError> {
    let bytes = header.as_bytes();
    if bytes.len() < HEADER_PREFIX_LEN {
        return Err(DecryptError::Integrity);
    }

    let (stored_auth, rest) = bytes.split_at(DIGEST_SIZE);
    let (stored_hash, payload) = rest.split_at(DIGEST_SIZE);

    let expected_auth = Zeroizing::new(
        password_auth_value(master).map_err(|e| DecryptError::Unexpected(e.to_string()))?,
    );
    if !constant_time_eq(expected_auth.as_slice(), stored_auth) {
        return Err(DecryptError::Authentication);
    }

    let plaintext = decompress(payload)?;
    if !constant_time_eq(&hash(&plaintext), stored_hash) {
        return Err(DecryptError::Integrity);
    }

    Ok(plaintext)
}
