//! # haven-crypto: Field-level encryption
//!
//! Encrypts and decrypts individual sensitive field values on their way to
//! and from durable storage, so that plaintext PHI never reaches the
//! datastore.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  EncryptionGateway                           │
//! │  ├─ empty-input guard                        │
//! │  ├─ base64 wire form                         │
//! │  └─ DataClass context binding                │
//! └─────────────────┬────────────────────────────┘
//!                   │ KeyService (KMS seam)
//!                   ▼
//! ┌──────────────────────────────────────────────┐
//! │  LocalKeyService (AES-256-GCM)               │
//! │  ├─ random 96-bit nonce per call             │
//! │  └─ class tag authenticated as AAD           │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The gateway is deliberately provider-agnostic: production deployments
//! substitute a real KMS client behind [`KeyService`]; the bundled
//! [`LocalKeyService`] performs the same envelope shape in process.
//!
//! ## Round trip
//!
//! ```
//! use haven_crypto::{EncryptionGateway, LocalKeyService};
//! use haven_types::DataClass;
//! use std::sync::Arc;
//!
//! let kms = Arc::new(LocalKeyService::generate("phi-key-1"));
//! let gateway = EncryptionGateway::new(kms, "phi-key-1");
//!
//! let ciphertext = gateway.encrypt("John Doe", DataClass::Phi)?;
//! assert_ne!(ciphertext, "John Doe");
//!
//! let plaintext = gateway.decrypt(&ciphertext, DataClass::Phi)?;
//! assert_eq!(plaintext, "John Doe");
//! # Ok::<(), haven_crypto::CryptoError>(())
//! ```

mod gateway;
mod key_service;

pub use gateway::EncryptionGateway;
pub use key_service::{EncryptionContext, KeyService, LocalKeyService};

use thiserror::Error;

/// Error type for encryption-gateway operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encrypting or decrypting an empty value is always a caller bug.
    #[error("{what} must not be empty")]
    EmptyInput { what: &'static str },

    /// The key service does not know the requested key.
    #[error("unknown encryption key: {0}")]
    UnknownKey(String),

    /// Ciphertext is not valid base64 or is too short to carry a nonce.
    #[error("malformed ciphertext blob")]
    InvalidCiphertext,

    /// The provider refused the operation. For decryption this covers
    /// tampered ciphertext and data-class context mismatches; no
    /// plaintext is ever returned on this path.
    #[error("encryption provider failure: {0}")]
    Provider(String),

    /// Decrypted bytes were not valid UTF-8 for a string field.
    #[error("decrypted value is not valid UTF-8")]
    InvalidPlaintext,
}

/// Result type for encryption-gateway operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
