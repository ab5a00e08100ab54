//! Common error types for Tricrypt.

use thiserror::Error;

/// Top-level error type for Tricrypt operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input provided (empty plaintext or password, bad configuration).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cryptographic primitive failed while encrypting.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// Compressing the payload failed.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Serialization or deserialization of configuration failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Decryption failed. Every decrypt-path failure is reported through this variant.
    #[error("Decryption failed: {0}")]
    Decrypt(#[from] DecryptError),
}

impl Error {
    /// The decrypt failure kind, if this is a decrypt error.
    pub fn as_decrypt(&self) -> Option<&DecryptError> {
        match self {
            Error::Decrypt(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure kinds of a decrypt call.
///
/// Raw primitive errors never appear here; they are mapped where they occur.
/// `Authentication` intentionally carries no detail about which cascade layer
/// rejected the data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptError {
    /// Empty envelope or password.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The envelope is structurally malformed.
    #[error("malformed envelope: {0}")]
    Format(String),

    /// Wrong password or tampered envelope.
    #[error("authentication failed: wrong password or corrupted data")]
    Authentication,

    /// The recovered plaintext does not match its embedded hash.
    #[error("plaintext integrity check failed")]
    Integrity,

    /// The compressed payload could not be inflated.
    #[error("decompression failed: {0}")]
    Decompression(String),

    /// Anything not covered above.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_error_converts() {
        let err: Error = DecryptError::Authentication.into();
        assert_eq!(err.as_decrypt(), Some(&DecryptError::Authentication));
        assert!(Error::InvalidInput("x".into()).as_decrypt().is_none());
    }

    #[test]
    fn test_authentication_message_is_layer_free() {
        let msg = Error::from(DecryptError::Authentication).to_string();
        assert!(!msg.contains("layer"));
        assert!(msg.starts_with("Decryption failed"));
    }
}
