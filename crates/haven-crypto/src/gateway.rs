//! The field-level encryption gateway.

use crate::key_service::{EncryptionContext, KeyService};
use crate::{CryptoError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use haven_types::DataClass;
use std::sync::Arc;

/// Gateway every sensitive field value passes through on its way to or
/// from durable storage.
///
/// Wraps a [`KeyService`] with input validation, the base64 wire form,
/// and data-class context binding. The gateway itself holds no key
/// material; the configured key id names a key owned by the provider.
pub struct EncryptionGateway {
    kms: Arc<dyn KeyService>,
    key_id: String,
}

impl EncryptionGateway {
    /// Create a gateway over the given provider and key.
    ///
    /// The key id comes from configuration and is required before first
    /// use; see `haven-config`.
    pub fn new(kms: Arc<dyn KeyService>, key_id: impl Into<String>) -> Self {
        Self {
            kms,
            key_id: key_id.into(),
        }
    }

    /// Encrypt a field value under the given classification.
    ///
    /// Non-deterministic: repeated calls on identical plaintext yield
    /// different ciphertexts.
    ///
    /// # Errors
    ///
    /// `EmptyInput` for an empty plaintext; provider errors pass through.
    pub fn encrypt(&self, plaintext: &str, data_class: DataClass) -> Result<String> {
        if plaintext.is_empty() {
            return Err(CryptoError::EmptyInput { what: "plaintext" });
        }

        let context = EncryptionContext::now(data_class);
        let blob = self
            .kms
            .encrypt(&self.key_id, plaintext.as_bytes(), &context)?;

        Ok(BASE64.encode(blob))
    }

    /// Decrypt a ciphertext produced by [`EncryptionGateway::encrypt`].
    ///
    /// The classification must match the one supplied at encrypt time;
    /// a mismatch fails closed with no plaintext returned.
    pub fn decrypt(&self, ciphertext: &str, data_class: DataClass) -> Result<String> {
        if ciphertext.is_empty() {
            return Err(CryptoError::EmptyInput { what: "ciphertext" });
        }

        let blob = BASE64
            .decode(ciphertext)
            .map_err(|_| CryptoError::InvalidCiphertext)?;

        let plaintext = self.kms.decrypt(&self.key_id, &blob, data_class)?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidPlaintext)
    }

    /// Encrypt a participant-record field. Defaults to [`DataClass::Phi`].
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String> {
        self.encrypt(plaintext, DataClass::Phi)
    }

    /// Decrypt a participant-record field. Defaults to [`DataClass::Phi`].
    pub fn decrypt_field(&self, ciphertext: &str) -> Result<String> {
        self.decrypt(ciphertext, DataClass::Phi)
    }
}

impl Clone for EncryptionGateway {
    fn clone(&self) -> Self {
        Self {
            kms: Arc::clone(&self.kms),
            key_id: self.key_id.clone(),
        }
    }
}
