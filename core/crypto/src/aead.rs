//! Authenticated encryption using AES-256-GCM with 16-byte nonces.
//!
//! GCM nonces other than 96 bits are run through GHASH to form the initial
//! counter block (NIST SP 800-38D, section 7.1). `AesGcm<Aes256, U16>` does
//! exactly that, so the full 16 bytes are used without truncation.
//! Tags are kept detached from the ciphertext because the envelope stores
//! them in their own segments.

use aes_gcm::{
    aead::{consts::U16, generic_array::GenericArray, AeadInPlace, KeyInit},
    aes::Aes256,
    AesGcm,
};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::keys::KEY_LENGTH;
use tricrypt_common::{Error, Result};

/// Nonce size used by every cascade layer (16 bytes).
pub const NONCE_SIZE: usize = 16;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Generate a random nonce.
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

fn cipher(key: &[u8]) -> Result<Aes256Gcm16> {
    if key.len() != KEY_LENGTH {
        return Err(Error::Crypto(format!(
            "Invalid key length: expected {}, got {}",
            KEY_LENGTH,
            key.len()
        )));
    }
    Aes256Gcm16::new_from_slice(key).map_err(|e| Error::Crypto(format!("Invalid key: {}", e)))
}

/// Encrypt plaintext with the given nonce, returning ciphertext and tag.
///
/// # Preconditions
/// - `key` must be exactly KEY_LENGTH bytes
/// - `nonce` must never be reused with the same key
///
/// # Postconditions
/// - Ciphertext length equals plaintext length
pub fn seal(
    key: &[u8],
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_SIZE])> {
    let cipher = cipher(key)?;

    // Holds plaintext until encryption succeeds.
    let mut buffer = Zeroizing::new(plaintext.to_vec());
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), b"", buffer.as_mut_slice())
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);
    Ok((std::mem::take(&mut *buffer), tag_bytes))
}

/// Verify the tag and decrypt.
///
/// # Errors
/// - Returns error if key length is incorrect
/// - Returns error if authentication fails (wrong key, nonce, tag or
///   tampered ciphertext); no plaintext is released in that case
pub fn open(
    key: &[u8],
    nonce: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
    tag: &[u8; TAG_SIZE],
) -> Result<Vec<u8>> {
    let cipher = cipher(key)?;

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(nonce),
            b"",
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|e| Error::Crypto(format!("Decryption failed: {}", e)))?;

    Ok(buffer)
}
