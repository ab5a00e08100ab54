//! Three-layer AES-256-GCM cascade.
//!
//! Each layer has its own random salt (and therefore its own key) and its
//! own random nonce. Layers are applied in order 1, 2, 3 and removed in
//! order 3, 2, 1; the output of one pass is the input of the next, so the
//! passes are strictly sequential.

use tracing::debug;
use zeroize::Zeroizing;

use tricrypt_common::{DecryptError, Result, SensitiveBytes};
use tricrypt_crypto::{
    aead, derive_layer_key, generate_nonce, KdfParams, LayerSalt, MasterKey, NONCE_SIZE, TAG_SIZE,
};

/// Number of encryption layers.
pub const LAYER_COUNT: usize = 3;

/// Public per-layer values stored in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerParams {
    /// Salt for this layer's key derivation.
    pub salt: LayerSalt,
    /// AEAD nonce for this layer.
    pub nonce: [u8; NONCE_SIZE],
    /// AEAD tag produced by this layer.
    pub tag: [u8; TAG_SIZE],
}

/// Result of running the cascade forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutput {
    /// Layer values in application order.
    pub layers: [LayerParams; LAYER_COUNT],
    /// Ciphertext of the last layer.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `header` through all three layers.
///
/// Fresh salts and nonces are drawn for every layer. Layer keys are dropped
/// (and zeroized) as soon as their pass completes.
pub fn encrypt(master: &MasterKey, params: &KdfParams, header: &[u8]) -> Result<CascadeOutput> {
    let mut layers = Vec::with_capacity(LAYER_COUNT);
    let mut current = Zeroizing::new(header.to_vec());

    for index in 0..LAYER_COUNT {
        let salt = LayerSalt::generate();
        let key = derive_layer_key(master, &salt, params)?;
        let nonce = generate_nonce();

        let (ciphertext, tag) = aead::seal(key.as_bytes(), &nonce, &current)?;
        debug!(layer = index + 1, size = ciphertext.len(), "Layer sealed");

        layers.push(LayerParams { salt, nonce, tag });
        current = Zeroizing::new(ciphertext);
    }

    Ok(CascadeOutput {
        layers: [layers[0], layers[1], layers[2]],
        ciphertext: std::mem::take(&mut *current),
    })
}

/// Remove all three layers, last applied first.
///
/// The first tag mismatch aborts with [`DecryptError::Authentication`]. The
/// error is the same for every layer.
pub fn decrypt(
    master: &MasterKey,
    params: &KdfParams,
    layers: &[LayerParams; LAYER_COUNT],
    ciphertext: &[u8],
) -> std::result::Result<SensitiveBytes, DecryptError> {
    let mut current = Zeroizing::new(ciphertext.to_vec());

    for (index, layer) in layers.iter().enumerate().rev() {
        let key = derive_layer_key(master, &layer.salt, params)
            .map_err(|e| DecryptError::Unexpected(e.to_string()))?;

        let opened = aead::open(key.as_bytes(), &layer.nonce, &current, &layer.tag)
            .map_err(|_| DecryptError::Authentication)?;
        debug!(layer = index + 1, "Layer opened");

        current = Zeroizing::new(opened);
    }

    Ok(SensitiveBytes::new(std::mem::take(&mut *current)))
}
