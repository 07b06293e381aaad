//! Keyed collection of explicit per-resource access grants.

use haven_types::{AclEntry, Action, Resource};
use std::collections::HashMap;

/// In-memory ACL store, keyed by (resource kind, resource id).
///
/// Each key holds at most one entry per user. The store is owned by a
/// single service instance; hosts that share it across threads wrap it in
/// a mutex to keep upsert/remove atomic.
#[derive(Debug, Default)]
pub struct AclStore {
    grants: HashMap<(String, String), Vec<AclEntry>>,
}

impl AclStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(resource: &Resource) -> (String, String) {
        (resource.kind.clone(), resource.id.clone())
    }

    /// Insert or replace a grant.
    ///
    /// Upserts by (user, resource kind, resource id): an existing entry
    /// for the same user on the same resource is replaced wholesale, not
    /// merged. A re-grant therefore narrows access when the new
    /// permission set is smaller.
    pub fn grant(&mut self, entry: AclEntry) {
        let key = (entry.resource_kind.clone(), entry.resource_id.clone());
        let entries = self.grants.entry(key).or_default();

        match entries.iter_mut().find(|e| e.user_id == entry.user_id) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Remove a user's grant on a resource. No-op if absent.
    ///
    /// The resource key is dropped entirely once its entry list becomes
    /// empty, so enumeration never sees stale empty keys.
    pub fn revoke(&mut self, user_id: &str, resource: &Resource) {
        let key = Self::key(resource);
        if let Some(entries) = self.grants.get_mut(&key) {
            entries.retain(|e| e.user_id != user_id);
            if entries.is_empty() {
                self.grants.remove(&key);
            }
        }
    }

    /// Whether an explicit grant allows `user_id` to perform `action`.
    pub fn allows(&self, user_id: &str, resource: &Resource, action: Action) -> bool {
        self.grants
            .get(&Self::key(resource))
            .is_some_and(|entries| {
                entries
                    .iter()
                    .any(|e| e.user_id == user_id && e.allows(action))
            })
    }

    /// Snapshot of all grants on a resource.
    pub fn resource_acl(&self, resource: &Resource) -> Vec<AclEntry> {
        self.grants
            .get(&Self::key(resource))
            .cloned()
            .unwrap_or_default()
    }

    /// Resource ids for which an explicit grant exists for `user_id`,
    /// optionally restricted to one resource kind.
    ///
    /// Reflects explicit entries only. Role-implied access (an admin's
    /// universal grant, a supervisor's global read) is intentionally
    /// invisible to this enumeration.
    pub fn user_accessible_resources(&self, user_id: &str, kind: Option<&str>) -> Vec<String> {
        let mut ids: Vec<String> = self
            .grants
            .iter()
            .filter(|((entry_kind, _), _)| kind.is_none_or(|k| entry_kind == k))
            .filter(|(_, entries)| entries.iter().any(|e| e.user_id == user_id))
            .map(|((_, id), _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of resources with at least one grant.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_types::PermissionSet;

    fn entry(user: &str, resource: &Resource, actions: Vec<Action>) -> AclEntry {
        AclEntry::new(user, resource, actions, "admin")
    }

    #[test]
    fn test_grant_then_revoke_excludes_user() {
        let mut store = AclStore::new();
        let resource = Resource::new("assessment", "a1");

        store.grant(entry("u1", &resource, vec![Action::Read]));
        assert!(store.allows("u1", &resource, Action::Read));

        store.revoke("u1", &resource);
        assert!(!store.allows("u1", &resource, Action::Read));
        assert!(
            store
                .resource_acl(&resource)
                .iter()
                .all(|e| e.user_id != "u1")
        );
    }

    #[test]
    fn test_regrant_replaces_wholesale() {
        let mut store = AclStore::new();
        let resource = Resource::new("assessment", "a1");

        store.grant(entry("u1", &resource, vec![Action::Read, Action::Write]));
        assert!(store.allows("u1", &resource, Action::Write));

        // Narrower re-grant: Write must disappear, not union in
        store.grant(entry("u1", &resource, vec![Action::Read]));
        assert!(store.allows("u1", &resource, Action::Read));
        assert!(!store.allows("u1", &resource, Action::Write));

        let acl = store.resource_acl(&resource);
        assert_eq!(acl.len(), 1, "one entry per user per resource");
    }

    #[test]
    fn test_empty_key_removed_after_last_revoke() {
        let mut store = AclStore::new();
        let resource = Resource::new("goal_plan", "g1");

        store.grant(entry("u1", &resource, vec![Action::Read]));
        store.grant(entry("u2", &resource, vec![Action::Read]));
        assert_eq!(store.len(), 1);

        store.revoke("u1", &resource);
        assert_eq!(store.len(), 1, "key stays while u2's grant remains");

        store.revoke("u2", &resource);
        assert!(store.is_empty(), "key dropped with its last entry");
    }

    #[test]
    fn test_revoke_absent_is_noop() {
        let mut store = AclStore::new();
        let resource = Resource::new("assessment", "a1");
        store.revoke("u1", &resource);
        assert!(store.is_empty());
    }

    #[test]
    fn test_resource_identity_is_kind_and_id() {
        let mut store = AclStore::new();
        store.grant(entry("u1", &Resource::new("assessment", "x"), vec![Action::Read]));

        assert!(!store.allows("u1", &Resource::new("goal_plan", "x"), Action::Read));
        assert!(store.allows("u1", &Resource::new("assessment", "x"), Action::Read));
    }

    #[test]
    fn test_user_accessible_resources_explicit_only() {
        let mut store = AclStore::new();
        store.grant(entry("u1", &Resource::new("assessment", "a1"), vec![Action::Read]));
        store.grant(entry("u1", &Resource::new("assessment", "a2"), vec![Action::Read]));
        store.grant(entry("u1", &Resource::new("goal_plan", "g1"), vec![Action::Read]));
        store.grant(entry("u2", &Resource::new("assessment", "a3"), vec![Action::Read]));

        let all = store.user_accessible_resources("u1", None);
        assert_eq!(all, vec!["a1", "a2", "g1"]);

        let assessments = store.user_accessible_resources("u1", Some("assessment"));
        assert_eq!(assessments, vec!["a1", "a2"]);

        assert!(store.user_accessible_resources("u3", None).is_empty());
    }

    #[test]
    fn test_empty_permission_set_grants_nothing() {
        let mut store = AclStore::new();
        let resource = Resource::new("assessment", "a1");
        store.grant(AclEntry::new("u1", &resource, PermissionSet::empty(), "admin"));

        assert!(!store.allows("u1", &resource, Action::Read));
        assert_eq!(store.resource_acl(&resource).len(), 1);
    }
}
