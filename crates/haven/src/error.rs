//! Top-level error type for the Haven SDK.

use thiserror::Error;

/// Error type covering all Haven security-core operations.
///
/// Each variant wraps the error of the subsystem it came from; the SDK
/// surface never invents error cases of its own.
#[derive(Debug, Error)]
pub enum HavenError {
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] haven_config::ConfigError),

    /// Field encryption or decryption failed.
    #[error(transparent)]
    Crypto(#[from] haven_crypto::CryptoError),

    /// An audit-log operation failed.
    #[error(transparent)]
    Audit(#[from] haven_audit::AuditError),
}

/// Result alias for Haven SDK operations.
pub type Result<T> = std::result::Result<T, HavenError>;
