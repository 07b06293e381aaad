//! # haven-types: Core type definitions
//!
//! Shared vocabulary for the Haven access-control and audit core:
//! - **Roles** (3 roles: PeerSpecialist, Supervisor, Admin)
//! - **Subjects and resources** evaluated by the decision engine
//! - **Actions and permission sets** carried by ACL grants
//! - **Data classifications** binding ciphertext to its sensitivity class
//! - **Severities** for security events
//!
//! ## Roles
//!
//! | Role           | Read | Write | Delete | Export | Scope                       |
//! |----------------|------|-------|--------|--------|-----------------------------|
//! | PeerSpecialist | ✓    | ✓     | ✓      | ✓      | Assigned participants only  |
//! | Supervisor     | ✓    | ACL   | ACL    | ACL    | Org-wide read               |
//! | Admin          | ✓    | ✓     | ✓      | ✓      | Everything                  |
//!
//! Anything that is not one of these three roles is treated as no role at
//! all: [`Role::parse`] rejects unknown strings and the decision engine
//! denies by default.

pub mod acl;
pub mod classification;
pub mod resource;
pub mod role;

pub use acl::{AclEntry, PermissionSet};
pub use classification::DataClass;
pub use resource::{Action, Resource, Subject};
pub use role::Role;

use serde::{Deserialize, Serialize};

/// Severity of a security event.
///
/// Ordered from least to most severe. Alerts at [`Severity::High`] or above
/// require action from the security team.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Whether events at this severity require follow-up action.
    pub fn requires_action(self) -> bool {
        self >= Severity::High
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_requires_action_threshold() {
        assert!(!Severity::Low.requires_action());
        assert!(!Severity::Medium.requires_action());
        assert!(Severity::High.requires_action());
        assert!(Severity::Critical.requires_action());
    }

    #[test]
    fn test_severity_serde_lowercase() {
        let json = serde_json::to_string(&Severity::High).expect("serialize");
        assert_eq!(json, "\"high\"");

        let parsed: Severity = serde_json::from_str("\"critical\"").expect("deserialize");
        assert_eq!(parsed, Severity::Critical);
    }
}
