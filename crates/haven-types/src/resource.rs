//! Subjects, resources, and actions evaluated by the decision engine.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Resource kind for participant records.
///
/// Peer specialists get caseload-based access to this kind; every other
/// kind requires an explicit grant for them.
pub const PARTICIPANT_KIND: &str = "participant";

/// Action that can be performed on a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Read a protected record.
    Read,

    /// Create or update a protected record.
    Write,

    /// Delete a protected record.
    Delete,

    /// Export data outside the system.
    ///
    /// High-risk: exported data leaves the audit perimeter, so export
    /// grants are always explicit for non-admin roles.
    Export,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
            Action::Export => "export",
        }
    }

    /// Actions that modify or extract data, as opposed to viewing it.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Action::Read)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A protected resource, identified by its (kind, id) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Resource kind, e.g. `"participant"`, `"assessment"`, `"goal_plan"`.
    pub kind: String,
    /// Identifier unique within the kind.
    pub id: String,
}

impl Resource {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Shorthand for a participant record resource.
    pub fn participant(id: impl Into<String>) -> Self {
        Self::new(PARTICIPANT_KIND, id)
    }

    pub fn is_participant(&self) -> bool {
        self.kind == PARTICIPANT_KIND
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// The authenticated caller whose access is being decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Stable user identifier.
    pub user_id: String,
    /// Recognized role. Callers that cannot resolve a known role must not
    /// construct a `Subject` at all; the engine denies them by default.
    pub role: Role,
    /// Organization the user belongs to.
    pub organization_id: String,
    /// Participant ids on this user's caseload.
    ///
    /// Only meaningful for [`Role::PeerSpecialist`]; ignored for other
    /// roles.
    #[serde(default)]
    pub assigned_participants: BTreeSet<String>,
}

impl Subject {
    pub fn new(user_id: impl Into<String>, role: Role, organization_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            organization_id: organization_id.into(),
            assigned_participants: BTreeSet::new(),
        }
    }

    /// Builder-style caseload assignment.
    pub fn with_participants<I, S>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_participants = participants.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_assigned_to(&self, participant_id: &str) -> bool {
        self.assigned_participants.contains(participant_id)
    }
}
