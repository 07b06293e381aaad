#![allow(clippy::match_same_arms)]
//! Role definitions for the access-control core.
//!
//! Defines 3 roles with escalating privileges:
//! - PeerSpecialist: full access to assigned participants only
//! - Supervisor: org-wide read, explicit grants for anything else
//! - Admin: full access (least restrictive)

use serde::{Deserialize, Serialize};

/// Role in the access-control system.
///
/// Roles are ordered from least to most privileged:
/// PeerSpecialist < Supervisor < Admin
///
/// There is deliberately no catch-all "unknown" variant. A role string
/// that does not name one of these three roles fails to parse, and the
/// decision engine treats the absence of a recognized role as deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Front-line peer-recovery specialist.
    ///
    /// **Permissions:**
    /// - Full access to participants on their caseload
    /// - No implied access to any other resource
    ///
    /// **Use Cases:**
    /// - Peer specialists running intakes, assessments, and goal reviews
    PeerSpecialist,

    /// Program supervisor.
    ///
    /// **Permissions:**
    /// - Read access across the organization
    /// - Write/Delete/Export only through an explicit grant
    ///
    /// **Use Cases:**
    /// - Clinical supervision and caseload review
    /// - Quality assurance
    Supervisor,

    /// Administrator with full access.
    ///
    /// **Permissions:**
    /// - Every action on every resource
    /// - Can grant and revoke access
    ///
    /// **Use Cases:**
    /// - System administrators
    /// - Emergency break-glass access
    Admin,
}

impl Role {
    /// Parse a role from its wire representation.
    ///
    /// Returns `None` for anything that is not exactly one of the three
    /// known roles. Unrecognized values are never coerced onto a known
    /// role; callers fall through to deny.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "peer_specialist" => Some(Role::PeerSpecialist),
            "supervisor" => Some(Role::Supervisor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::PeerSpecialist => "peer_specialist",
            Role::Supervisor => "supervisor",
            Role::Admin => "admin",
        }
    }

    /// Whether this role carries an implied read grant on every resource.
    pub fn has_global_read(self) -> bool {
        match self {
            Role::PeerSpecialist => false,
            Role::Supervisor => true,
            Role::Admin => true,
        }
    }

    /// Whether this role bypasses ACL evaluation entirely.
    pub fn has_full_access(self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Error returned when a role string names no known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl std::fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown role: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}
