//! Key-service boundary and the in-process AES-256-GCM provider.
//!
//! [`KeyService`] is the seam where a real Key Management Service plugs
//! in. The contract mirrors a KMS encrypt/decrypt API: an encryption
//! context is bound to the ciphertext at encrypt time, and decryption
//! with a different context must fail closed.

use crate::{CryptoError, Result};
use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, Payload},
};
use chrono::{DateTime, Utc};
use haven_types::DataClass;
use rand::RngCore;
use std::collections::HashMap;
use zeroize::Zeroizing;

/// Context bound to a ciphertext at encrypt time.
///
/// The data class is authenticated into the ciphertext; the timestamp is
/// advisory metadata for the provider's own audit trail and is not
/// required again at decrypt time.
#[derive(Debug, Clone)]
pub struct EncryptionContext {
    pub data_class: DataClass,
    pub timestamp: DateTime<Utc>,
}

impl EncryptionContext {
    pub fn now(data_class: DataClass) -> Self {
        Self {
            data_class,
            timestamp: Utc::now(),
        }
    }
}

/// External key-management collaborator.
///
/// Implementations perform the actual cryptographic operations under a
/// named key. Decryption must fail closed when the supplied data class
/// does not match the class bound at encrypt time.
pub trait KeyService: Send + Sync {
    /// Encrypt `plaintext` under `key_id`, binding the context.
    ///
    /// The returned blob is opaque to callers; repeated calls on the same
    /// plaintext yield different blobs.
    fn encrypt(&self, key_id: &str, plaintext: &[u8], context: &EncryptionContext)
    -> Result<Vec<u8>>;

    /// Decrypt a blob produced by [`KeyService::encrypt`].
    ///
    /// Fails with no plaintext returned if the blob was tampered with or
    /// if `data_class` differs from the encrypt-time class.
    fn decrypt(&self, key_id: &str, blob: &[u8], data_class: DataClass) -> Result<Vec<u8>>;
}

/// 96-bit GCM nonce prepended to each ciphertext blob.
const NONCE_LEN: usize = 12;

/// In-process AES-256-GCM key service.
///
/// Holds named 256-bit keys in memory, zeroized on drop. Each encryption
/// draws a fresh random nonce, so identical plaintexts produce distinct
/// ciphertexts. The data class is authenticated as associated data:
/// decrypting under a different class fails the GCM tag check.
///
/// Blob layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
pub struct LocalKeyService {
    keys: HashMap<String, Zeroizing<[u8; 32]>>,
}

impl LocalKeyService {
    /// Create a service with a single randomly generated key.
    pub fn generate(key_id: impl Into<String>) -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self::with_key(key_id, key)
    }

    /// Create a service with a single caller-supplied key.
    pub fn with_key(key_id: impl Into<String>, key: [u8; 32]) -> Self {
        let mut keys = HashMap::new();
        keys.insert(key_id.into(), Zeroizing::new(key));
        Self { keys }
    }

    /// Register an additional key, e.g. during key rotation.
    pub fn add_key(&mut self, key_id: impl Into<String>, key: [u8; 32]) {
        self.keys.insert(key_id.into(), Zeroizing::new(key));
    }

    fn cipher(&self, key_id: &str) -> Result<Aes256Gcm> {
        let key = self
            .keys
            .get(key_id)
            .ok_or_else(|| CryptoError::UnknownKey(key_id.to_string()))?;
        Aes256Gcm::new_from_slice(key.as_ref()).map_err(|e| CryptoError::Provider(e.to_string()))
    }
}

impl KeyService for LocalKeyService {
    fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        context: &EncryptionContext,
    ) -> Result<Vec<u8>> {
        let cipher = self.cipher(key_id)?;

        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);

        let payload = Payload {
            msg: plaintext,
            aad: context.data_class.as_str().as_bytes(),
        };

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), payload)
            .map_err(|e| CryptoError::Provider(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    fn decrypt(&self, key_id: &str, blob: &[u8], data_class: DataClass) -> Result<Vec<u8>> {
        if blob.len() <= NONCE_LEN {
            return Err(CryptoError::InvalidCiphertext);
        }

        let cipher = self.cipher(key_id)?;
        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);

        let payload = Payload {
            msg: ciphertext,
            aad: data_class.as_str().as_bytes(),
        };

        cipher
            .decrypt(Nonce::from_slice(nonce), payload)
            .map_err(|_| {
                CryptoError::Provider(
                    "authentication failed: ciphertext tampered or context mismatch".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> LocalKeyService {
        LocalKeyService::with_key("k1", [0x42; 32])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let kms = service();
        let ctx = EncryptionContext::now(DataClass::Phi);

        let blob = kms.encrypt("k1", b"secret message", &ctx).expect("encrypt");
        let plaintext = kms.decrypt("k1", &blob, DataClass::Phi).expect("decrypt");

        assert_eq!(&plaintext, b"secret message");
    }

    #[test]
    fn test_nondeterministic_ciphertexts() {
        let kms = service();
        let ctx = EncryptionContext::now(DataClass::Phi);

        let blob1 = kms.encrypt("k1", b"same input", &ctx).expect("encrypt");
        let blob2 = kms.encrypt("k1", b"same input", &ctx).expect("encrypt");

        assert_ne!(blob1, blob2, "fresh nonce per call");
    }

    #[test]
    fn test_class_mismatch_fails_closed() {
        let kms = service();
        let ctx = EncryptionContext::now(DataClass::Phi);

        let blob = kms.encrypt("k1", b"ssn", &ctx).expect("encrypt");
        let result = kms.decrypt("k1", &blob, DataClass::Financial);

        assert!(result.is_err(), "wrong data class must not decrypt");
    }

    #[test]
    fn test_tampered_blob_fails() {
        let kms = service();
        let ctx = EncryptionContext::now(DataClass::General);

        let mut blob = kms.encrypt("k1", b"payload", &ctx).expect("encrypt");
        let last = blob.len() - 1;
        blob[last] ^= 0xFF;

        assert!(kms.decrypt("k1", &blob, DataClass::General).is_err());
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let kms = service();
        let result = kms.decrypt("k1", &[0u8; NONCE_LEN], DataClass::Phi);
        assert!(matches!(result, Err(CryptoError::InvalidCiphertext)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let kms = service();
        let ctx = EncryptionContext::now(DataClass::Phi);
        let result = kms.encrypt("missing", b"x", &ctx);
        assert!(matches!(result, Err(CryptoError::UnknownKey(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let mut kms = service();
        kms.add_key("k2", [0x43; 32]);
        let ctx = EncryptionContext::now(DataClass::Phi);

        let blob = kms.encrypt("k1", b"secret", &ctx).expect("encrypt");
        assert!(kms.decrypt("k2", &blob, DataClass::Phi).is_err());
    }
}
