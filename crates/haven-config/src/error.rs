//! Configuration errors.

use thiserror::Error;

/// Error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The KMS key id is required before any field encryption can run.
    /// Supply it via `HAVEN_KMS_KEY_ID` or the `[kms]` section of
    /// haven.toml.
    #[error("KMS key id is not configured (set HAVEN_KMS_KEY_ID or [kms].key_id)")]
    MissingKmsKeyId,

    /// A configuration source failed to load or parse.
    #[error("failed to load configuration: {0}")]
    Load(String),
}
