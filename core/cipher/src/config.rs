//! Cipher configuration.

use serde::{Deserialize, Serialize};

use tricrypt_common::{Error, Result};
use tricrypt_crypto::KdfParams;

/// zlib level used when none is configured.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

fn default_compression_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

/// Immutable settings handed to [`crate::SecureCipher`].
///
/// Only the KDF iteration counts affect decryption. The compression level
/// changes the envelope size but any level decrypts the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherConfig {
    /// KDF parameters.
    pub kdf: KdfParams,
    /// zlib compression level, 0 to 9.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl CipherConfig {
    /// Create a configuration with the given KDF parameters and the default
    /// compression level.
    pub fn new(kdf: KdfParams) -> Self {
        Self {
            kdf,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }

    /// Set the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        self.kdf.validate()?;
        if self.compression_level > 9 {
            return Err(Error::InvalidInput(format!(
                "Compression level must be 0-9, got {}",
                self.compression_level
            )));
        }
        Ok(())
    }

    /// Serialize configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self::new(KdfParams::standard())
    }
}
