//! Access decision evaluation and unauthorized-access handling.

use crate::store::AclStore;
use haven_audit::{AlertRequest, AuditLog, SecurityAlert, generate_security_alert};
use haven_types::{AclEntry, Action, Resource, Role, Severity, Subject};
use tracing::{info, warn};

/// Alert type raised for a denied access attempt.
pub const UNAUTHORIZED_ACCESS_ATTEMPT: &str = "UNAUTHORIZED_ACCESS_ATTEMPT";

/// Outcome of [`AccessDecisionEngine::handle_unauthorized_access`].
///
/// `denied` is always true: the handler exists to record a denial that
/// [`AccessDecisionEngine::check_access`] already made, and nothing on
/// the recording path can overturn it.
#[derive(Debug, Clone)]
pub struct AccessDenial {
    pub denied: bool,
    pub alert: SecurityAlert,
}

/// Evaluates (subject, resource, action) against role rules and explicit
/// ACL grants.
///
/// Owns the [`AclStore`]; construct one engine per service instance and
/// inject it into callers, rather than sharing module-level state.
#[derive(Debug, Default)]
pub struct AccessDecisionEngine {
    acl: AclStore,
}

impl AccessDecisionEngine {
    /// Create an engine with an empty ACL store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over a pre-populated store.
    pub fn with_store(acl: AclStore) -> Self {
        Self { acl }
    }

    /// Decide whether `subject` may perform `action` on `resource`.
    ///
    /// Pure function of the subject's role plus current ACL contents; no
    /// side effects beyond tracing. Evaluation order:
    ///
    /// 1. Admin → allow
    /// 2. Supervisor + Read → allow
    /// 3. Supervisor + other action → explicit ACL lookup
    /// 4. PeerSpecialist + participant resource → caseload membership
    /// 5. PeerSpecialist + other resource → explicit ACL lookup
    /// 6. everything else → deny
    pub fn check_access(&self, subject: &Subject, resource: &Resource, action: Action) -> bool {
        let allowed = match subject.role {
            Role::Admin => true,
            Role::Supervisor if action == Action::Read => true,
            Role::Supervisor => self.acl.allows(&subject.user_id, resource, action),
            Role::PeerSpecialist if resource.is_participant() => {
                subject.is_assigned_to(&resource.id)
            }
            Role::PeerSpecialist => self.acl.allows(&subject.user_id, resource, action),
        };

        if allowed {
            info!(
                user = %subject.user_id,
                role = %subject.role,
                action = %action,
                resource = %resource,
                "access granted"
            );
        } else {
            warn!(
                user = %subject.user_id,
                role = %subject.role,
                action = %action,
                resource = %resource,
                "access denied"
            );
        }

        allowed
    }

    /// Insert or replace an explicit grant. See [`AclStore::grant`].
    pub fn grant_access(&mut self, entry: AclEntry) {
        info!(
            user = %entry.user_id,
            resource = %format_args!("{}/{}", entry.resource_kind, entry.resource_id),
            granted_by = %entry.granted_by,
            "access granted by ACL entry"
        );
        self.acl.grant(entry);
    }

    /// Remove a user's grant on a resource. No-op if absent.
    pub fn revoke_access(&mut self, user_id: &str, resource: &Resource) {
        info!(user = %user_id, resource = %resource, "access revoked");
        self.acl.revoke(user_id, resource);
    }

    /// Snapshot of all grants on a resource.
    pub fn resource_acl(&self, resource: &Resource) -> Vec<AclEntry> {
        self.acl.resource_acl(resource)
    }

    /// Number of (user, resource) pairs holding explicit grants.
    pub fn acl_len(&self) -> usize {
        self.acl.len()
    }

    /// Resource ids with an explicit grant for `user_id`.
    ///
    /// Explicit entries only: role-implied access, including an admin's
    /// universal grant, does not appear here.
    pub fn user_accessible_resources(&self, user_id: &str, kind: Option<&str>) -> Vec<String> {
        self.acl.user_accessible_resources(user_id, kind)
    }

    /// Record a denial that [`AccessDecisionEngine::check_access`] made.
    ///
    /// Raises a high-severity [`UNAUTHORIZED_ACCESS_ATTEMPT`] alert
    /// through the audit log and returns it alongside the denial. The
    /// alert write is an in-memory append and cannot fail; were the log
    /// backed by fallible storage, a write failure would be logged and
    /// dropped here rather than block the Deny outcome.
    pub fn handle_unauthorized_access(
        &self,
        log: &mut AuditLog,
        subject: &Subject,
        resource: &Resource,
        action: Action,
        ip_address: &str,
        device_id: &str,
    ) -> AccessDenial {
        let description = format!(
            "user {} (role {}) attempted {} on {} from {} (device {})",
            subject.user_id, subject.role, action, resource, ip_address, device_id
        );

        let alert = generate_security_alert(
            log,
            AlertRequest {
                user_id: subject.user_id.clone(),
                severity: Severity::High,
                alert_type: UNAUTHORIZED_ACCESS_ATTEMPT.to_string(),
                description,
                requires_action: true,
            },
        );

        AccessDenial {
            denied: true,
            alert,
        }
    }
}
