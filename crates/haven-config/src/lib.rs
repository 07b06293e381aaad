//! Configuration management for the Haven security core
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (HAVEN_* prefix, highest precedence)
//! 2. haven.toml (project config)
//! 3. Built-in defaults (lowest precedence)
//!
//! The KMS key id has no default. It is environment-supplied and
//! required at first use: [`KmsConfig::require_key_id`] turns a missing
//! key id into a startup-time configuration error, never a runtime
//! fallback.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

/// Name of the project-level config file.
pub const CONFIG_FILE_NAME: &str = "haven.toml";

/// Main Haven security-core configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HavenConfig {
    pub kms: KmsConfig,
    pub session: SessionConfig,
}

/// Key Management Service settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KmsConfig {
    /// Id of the key all field encryption runs under. Required; there is
    /// deliberately no default.
    pub key_id: Option<String>,
    /// Provider region.
    pub region: Option<String>,
    /// Override endpoint for self-hosted or test providers.
    pub endpoint: Option<String>,
}

impl KmsConfig {
    /// The configured key id, or a startup-time error if missing.
    pub fn require_key_id(&self) -> Result<&str, ConfigError> {
        self.key_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingKmsKeyId)
    }
}

/// Session-timeout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity window in minutes before a session times out.
    pub timeout_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_minutes: 15 }
    }
}

impl HavenConfig {
    /// Load configuration for the given project directory.
    pub fn load(project_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Path of the project config file within a directory.
    pub fn config_file(project_dir: &Path) -> PathBuf {
        project_dir.join(CONFIG_FILE_NAME)
    }

    /// Serialize the configuration back to TOML, e.g. for `init`
    /// scaffolding.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HavenConfig::default();
        assert_eq!(config.session.timeout_minutes, 15);
        assert!(config.kms.key_id.is_none());
    }

    #[test]
    fn test_missing_key_id_is_config_error() {
        let kms = KmsConfig::default();
        assert!(matches!(
            kms.require_key_id(),
            Err(ConfigError::MissingKmsKeyId)
        ));

        let kms = KmsConfig {
            key_id: Some(String::new()),
            ..KmsConfig::default()
        };
        assert!(matches!(
            kms.require_key_id(),
            Err(ConfigError::MissingKmsKeyId)
        ));
    }

    #[test]
    fn test_present_key_id() {
        let kms = KmsConfig {
            key_id: Some("phi-key-1".into()),
            ..KmsConfig::default()
        };
        assert_eq!(kms.require_key_id().expect("key id"), "phi-key-1");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = HavenConfig {
            kms: KmsConfig {
                key_id: Some("phi-key-1".into()),
                region: Some("us-east-1".into()),
                endpoint: None,
            },
            session: SessionConfig { timeout_minutes: 30 },
        };

        let toml_text = config.to_toml().expect("serialize");
        let back: HavenConfig = toml::from_str(&toml_text).expect("parse");
        assert_eq!(back.kms.key_id.as_deref(), Some("phi-key-1"));
        assert_eq!(back.session.timeout_minutes, 30);
    }
}
