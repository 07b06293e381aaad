//! Data classification tags.
//!
//! Every encrypted field carries a classification. The class supplied at
//! encrypt time must be supplied again at decrypt time; the encryption
//! provider fails closed on a mismatch.

use serde::{Deserialize, Serialize};

/// Sensitivity classification of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataClass {
    /// Protected Health Information. The default class for participant
    /// record fields.
    Phi,
    /// Personally identifiable information that is not health data.
    Pii,
    /// Financial or billing data.
    Financial,
    /// Sensitive but unclassified application data.
    General,
}

impl DataClass {
    pub fn as_str(self) -> &'static str {
        match self {
            DataClass::Phi => "phi",
            DataClass::Pii => "pii",
            DataClass::Financial => "financial",
            DataClass::General => "general",
        }
    }
}

impl Default for DataClass {
    fn default() -> Self {
        DataClass::Phi
    }
}

impl std::fmt::Display for DataClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
