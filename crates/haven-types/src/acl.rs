//! ACL grant entries and permission sets.

use crate::resource::{Action, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Set of actions granted by an ACL entry.
///
/// Small ordered collection with dedup-on-grant semantics; iteration
/// order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    actions: Vec<Action>,
}

impl PermissionSet {
    pub fn new(actions: Vec<Action>) -> Self {
        let mut set = Self::empty();
        for action in actions {
            set.grant(action);
        }
        set
    }

    pub fn empty() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// A set granting every action.
    pub fn all() -> Self {
        Self::new(vec![
            Action::Read,
            Action::Write,
            Action::Delete,
            Action::Export,
        ])
    }

    pub fn contains(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Adds an action to the set. Duplicate grants are no-ops.
    pub fn grant(&mut self, action: Action) {
        if !self.actions.contains(&action) {
            self.actions.push(action);
        }
    }

    pub fn revoke(&mut self, action: Action) {
        self.actions.retain(|a| *a != action);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Action>> for PermissionSet {
    fn from(actions: Vec<Action>) -> Self {
        Self::new(actions)
    }
}

/// An explicit per-resource access grant.
///
/// At most one entry exists per user within a resource's grant list. A
/// repeated grant for the same (user, resource) replaces the previous
/// entry wholesale; permission sets are never merged across grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    /// User the grant applies to.
    pub user_id: String,
    /// Kind of the guarded resource.
    pub resource_kind: String,
    /// Identifier of the guarded resource within its kind.
    pub resource_id: String,
    /// Actions this grant allows.
    pub permissions: PermissionSet,
    /// When the grant was issued.
    pub granted_at: DateTime<Utc>,
    /// Who issued the grant.
    pub granted_by: String,
    /// Optional minimum-necessary justification recorded with the grant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AclEntry {
    pub fn new(
        user_id: impl Into<String>,
        resource: &Resource,
        permissions: impl Into<PermissionSet>,
        granted_by: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            resource_kind: resource.kind.clone(),
            resource_id: resource.id.clone(),
            permissions: permissions.into(),
            granted_at: Utc::now(),
            granted_by: granted_by.into(),
            reason: None,
        }
    }

    /// Builder-style justification.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn resource(&self) -> Resource {
        Resource::new(self.resource_kind.clone(), self.resource_id.clone())
    }

    pub fn allows(&self, action: Action) -> bool {
        self.permissions.contains(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_set_operations() {
        let mut set = PermissionSet::empty();
        assert!(!set.contains(Action::Read));

        set.grant(Action::Read);
        assert!(set.contains(Action::Read));

        set.grant(Action::Read); // Duplicate grant is no-op
        assert_eq!(set.iter().count(), 1);

        set.grant(Action::Write);
        assert!(set.contains(Action::Write));

        set.revoke(Action::Read);
        assert!(!set.contains(Action::Read));
        assert!(set.contains(Action::Write));
    }

    #[test]
    fn test_permission_set_all() {
        let set = PermissionSet::all();
        assert!(set.contains(Action::Read));
        assert!(set.contains(Action::Write));
        assert!(set.contains(Action::Delete));
        assert!(set.contains(Action::Export));
    }

    #[test]
    fn test_permission_set_dedups_on_construction() {
        let set = PermissionSet::new(vec![Action::Read, Action::Read, Action::Write]);
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn test_acl_entry_allows() {
        let resource = Resource::new("assessment", "a1");
        let entry = AclEntry::new("u1", &resource, vec![Action::Read, Action::Export], "admin")
            .with_reason("quarterly outcomes report");

        assert!(entry.allows(Action::Read));
        assert!(entry.allows(Action::Export));
        assert!(!entry.allows(Action::Write));
        assert!(!entry.allows(Action::Delete));
        assert_eq!(entry.resource(), resource);
        assert_eq!(entry.reason.as_deref(), Some("quarterly outcomes report"));
    }
}
