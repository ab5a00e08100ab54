//! Public encrypt/decrypt operations.

use tracing::{debug, info, warn};

use crate::cascade;
use crate::config::CipherConfig;
use crate::envelope::Envelope;
use crate::verifier;
use tricrypt_common::{DecryptError, Error, Result};
use tricrypt_crypto::{derive_master_key, MasterSalt};

/// Password-based encryption of short text messages.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of calls from any number of threads. Each call derives, uses and drops its
/// own key material; nothing is cached between calls.
///
/// Key wiping relies on drop and is best-effort: it cannot reach copies the
/// compiler, allocator or primitives may have made.
#[derive(Debug, Clone, Default)]
pub struct SecureCipher {
    config: CipherConfig,
}

impl SecureCipher {
    /// Create a cipher with the given configuration.
    ///
    /// # Errors
    /// - Invalid KDF iteration counts or compression level
    pub fn new(config: CipherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Encrypt `plaintext` under `password` and return the envelope text.
    ///
    /// # Errors
    /// - `Error::InvalidInput` if either argument is empty
    /// - `Error::Crypto` / `Error::Compression` if a primitive fails
    pub fn encrypt(&self, plaintext: &str, password: &str) -> Result<String> {
        if plaintext.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "Plaintext and password must not be empty".to_string(),
            ));
        }

        let master_salt = MasterSalt::generate();
        let master_key = derive_master_key(password.as_bytes(), &master_salt, &self.config.kdf)?;
        debug!("Master key derived");

        let header = verifier::build_header(&master_key, plaintext.as_bytes(), &self.config)?;
        let output = cascade::encrypt(&master_key, &self.config.kdf, &header)?;

        let envelope = Envelope {
            master_salt,
            layers: output.layers,
            ciphertext: output.ciphertext,
        };

        info!(
            plaintext_len = plaintext.len(),
            ciphertext_len = envelope.ciphertext_len(),
            "Message encrypted"
        );
        Ok(envelope.encode())
    }

    /// Decrypt an envelope produced by [`SecureCipher::encrypt`].
    ///
    /// # Errors
    /// Always `Error::Decrypt`, carrying one of:
    /// - `Validation` for empty arguments
    /// - `Format` for a malformed envelope (checked before any key derivation)
    /// - `Authentication` for a wrong password or tampered envelope
    /// - `Decompression` / `Integrity` for a corrupt payload
    pub fn decrypt(&self, envelope: &str, password: &str) -> Result<String> {
        self.try_decrypt(envelope, password).map_err(|e| {
            warn!(error = %e, "Decryption failed");
            Error::Decrypt(e)
        })
    }

    fn try_decrypt(&self, text: &str, password: &str) -> std::result::Result<String, DecryptError> {
        if text.is_empty() || password.is_empty() {
            return Err(DecryptError::Validation(
                "Envelope and password must not be empty".to_string(),
            ));
        }

        let envelope = Envelope::parse(text)?;
        debug!(ciphertext_len = envelope.ciphertext_len(), "Envelope parsed");

        let master_key =
            derive_master_key(password.as_bytes(), &envelope.master_salt, &self.config.kdf)
                .map_err(|e| DecryptError::Unexpected(e.to_string()))?;

        let header = cascade::decrypt(
            &master_key,
            &self.config.kdf,
            &envelope.layers,
            &envelope.ciphertext,
        )?;
        let plaintext = verifier::open_header(&master_key, &header)?;

        let text = std::str::from_utf8(&plaintext)
            .map_err(|e| DecryptError::Unexpected(format!("plaintext is not UTF-8: {}", e)))?;

        info!(plaintext_len = text.len(), "Message decrypted");
        Ok(text.to_owned())
    }
}

/// Encrypt with the standard configuration.
pub fn encrypt(plaintext: &str, password: &str) -> Result<String> {
    SecureCipher::default().encrypt(plaintext, password)
}

/// Decrypt with the standard configuration.
pub fn decrypt(envelope: &str, password: &str) -> Result<String> {
    SecureCipher::default().decrypt(envelope, password)
}
