//! Main entry point for the Haven SDK.
//!
//! `SecurityCore` wires the decision engine, encryption gateway, audit
//! log, and session monitor into one handle. Service code constructs a
//! single core per process and routes every access decision, PHI touch,
//! and session check through it so that nothing reaches the datastore
//! unchecked or unrecorded.

use std::sync::Arc;

use haven_access::{AccessDecisionEngine, AccessDenial};
use haven_audit::{
    AuditLog, AuditQuery, DataChangeEvent, PhiAccessEvent, RecordStore, SecurityAlert,
    SessionStart, get_security_alerts, resolve_security_alert, secure_delete,
};
use haven_config::HavenConfig;
use haven_crypto::{EncryptionGateway, KeyService, LocalKeyService};
use haven_session::SessionMonitor;
use haven_types::{AclEntry, Action, DataClass, Resource, Severity, Subject};
use uuid::Uuid;

use crate::error::Result;

/// Top-level handle over the Haven security core.
///
/// Owns all mutable security state. Not internally synchronized; wrap it
/// in the service's own lock if it must be shared across threads.
pub struct SecurityCore {
    engine: AccessDecisionEngine,
    gateway: EncryptionGateway,
    audit: AuditLog,
    sessions: SessionMonitor,
}

impl SecurityCore {
    /// Build a core from configuration and a key service.
    ///
    /// # Errors
    ///
    /// Fails if the configuration names no KMS key id; there is no
    /// fallback key.
    pub fn new(config: &HavenConfig, kms: Arc<dyn KeyService>) -> Result<Self> {
        let key_id = config.kms.require_key_id()?;
        tracing::info!(key_id, "security core initialized");
        Ok(Self {
            engine: AccessDecisionEngine::new(),
            gateway: EncryptionGateway::new(kms, key_id),
            audit: AuditLog::new(),
            sessions: SessionMonitor::new(),
        })
    }

    /// Build a core over an in-process key service with a freshly
    /// generated key. For development and tests; production deployments
    /// go through [`SecurityCore::new`] with a real KMS client.
    pub fn with_local_keys(key_id: &str) -> Self {
        Self {
            engine: AccessDecisionEngine::new(),
            gateway: EncryptionGateway::new(Arc::new(LocalKeyService::generate(key_id)), key_id),
            audit: AuditLog::new(),
            sessions: SessionMonitor::new(),
        }
    }

    // ---- Access control ----

    /// Decide whether `subject` may perform `action` on `resource`,
    /// without recording anything.
    pub fn check_access(&self, subject: &Subject, resource: &Resource, action: Action) -> bool {
        self.engine.check_access(subject, resource, action)
    }

    /// Decide and record: on denial, raises an unauthorized-access alert
    /// through the audit log before returning `false`.
    pub fn authorize(
        &mut self,
        subject: &Subject,
        resource: &Resource,
        action: Action,
        ip_address: &str,
        device_id: &str,
    ) -> bool {
        if self.engine.check_access(subject, resource, action) {
            return true;
        }
        self.engine.handle_unauthorized_access(
            &mut self.audit,
            subject,
            resource,
            action,
            ip_address,
            device_id,
        );
        false
    }

    /// Decide and record, returning the full denial (with its alert) on
    /// refusal.
    pub fn authorize_detailed(
        &mut self,
        subject: &Subject,
        resource: &Resource,
        action: Action,
        ip_address: &str,
        device_id: &str,
    ) -> std::result::Result<(), AccessDenial> {
        if self.engine.check_access(subject, resource, action) {
            return Ok(());
        }
        Err(self.engine.handle_unauthorized_access(
            &mut self.audit,
            subject,
            resource,
            action,
            ip_address,
            device_id,
        ))
    }

    /// Grant explicit permissions, replacing any existing grant for the
    /// same (user, resource) pair.
    pub fn grant_access(&mut self, entry: AclEntry) {
        self.engine.grant_access(entry);
    }

    /// Remove a user's explicit grant on a resource.
    pub fn revoke_access(&mut self, user_id: &str, resource: &Resource) {
        self.engine.revoke_access(user_id, resource);
    }

    /// All explicit grants on a resource.
    pub fn resource_acl(&self, resource: &Resource) -> Vec<AclEntry> {
        self.engine.resource_acl(resource)
    }

    /// Resource ids the user holds explicit grants on.
    pub fn user_accessible_resources(&self, user_id: &str, kind: Option<&str>) -> Vec<String> {
        self.engine.user_accessible_resources(user_id, kind)
    }

    // ---- Field encryption ----

    /// Encrypt a field value under the given classification.
    pub fn encrypt(&self, plaintext: &str, data_class: DataClass) -> Result<String> {
        Ok(self.gateway.encrypt(plaintext, data_class)?)
    }

    /// Decrypt a field value; the classification must match the one used
    /// at encrypt time.
    pub fn decrypt(&self, ciphertext: &str, data_class: DataClass) -> Result<String> {
        Ok(self.gateway.decrypt(ciphertext, data_class)?)
    }

    // ---- Audit trail ----

    /// Record a PHI access. Infallible: the metadata is stored in the
    /// clear.
    pub fn record_phi_access(&mut self, event: PhiAccessEvent) -> Uuid {
        self.audit.log_phi_access(event)
    }

    /// Record a field mutation, encrypting the old and new values before
    /// they reach the entry.
    pub fn record_data_change(&mut self, event: DataChangeEvent) -> Result<Uuid> {
        Ok(self.audit.log_data_change(&self.gateway, event)?)
    }

    /// Open a service-session audit entry.
    pub fn start_session_entry(&mut self, info: SessionStart) -> Uuid {
        self.audit.start_session(info)
    }

    /// Complete a service-session audit entry. Write-once; a second call
    /// for the same entry fails.
    pub fn end_session_entry(&mut self, entry_id: Uuid, summary: Option<String>) -> Result<()> {
        Ok(self.audit.end_session(entry_id, summary)?)
    }

    /// Query the audit trail.
    pub fn audit_entries(&self, filter: &AuditQuery) -> Vec<&haven_audit::AuditEntry> {
        self.audit.query(filter)
    }

    /// Read access to the audit log for richer queries.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // ---- Security alerts ----

    /// Alerts reconstructed from the audit trail, optionally filtered.
    pub fn security_alerts(
        &self,
        user_id: Option<&str>,
        severity: Option<Severity>,
    ) -> Vec<SecurityAlert> {
        get_security_alerts(&self.audit, user_id, severity)
    }

    /// Mark an alert resolved by appending a resolution event.
    pub fn resolve_alert(
        &mut self,
        alert_id: Uuid,
        resolved_by: &str,
        resolution: &str,
    ) -> Result<Uuid> {
        Ok(resolve_security_alert(
            &mut self.audit,
            alert_id,
            resolved_by,
            resolution,
        )?)
    }

    // ---- Sessions ----

    /// Open an authenticated session and return its id.
    pub fn create_session(&mut self, user_id: &str) -> String {
        self.sessions.create_session(user_id)
    }

    /// Refresh a session's activity timestamp. Returns false for unknown
    /// sessions.
    pub fn touch_session(&mut self, session_id: &str) -> bool {
        self.sessions.update_session_activity(session_id)
    }

    /// Whether a session has exceeded the inactivity window. Unknown
    /// sessions report timed out.
    pub fn is_session_timed_out(&self, session_id: &str) -> bool {
        self.sessions.check_session_timeout(session_id)
    }

    /// Terminate a session immediately.
    pub fn terminate_session(&mut self, session_id: &str) {
        self.sessions.terminate_session(session_id);
    }

    /// Drop every timed-out session, returning how many were removed.
    pub fn cleanup_expired_sessions(&mut self) -> usize {
        self.sessions.cleanup_expired_sessions()
    }

    /// Read access to the session monitor.
    pub fn sessions(&self) -> &SessionMonitor {
        &self.sessions
    }

    // ---- Secure deletion ----

    /// Overwrite-then-delete a retired record through the given store,
    /// recording the deletion in the audit trail on success.
    pub fn secure_delete_record(
        &mut self,
        store: &mut dyn RecordStore,
        performed_by: &str,
        table: &str,
        record_id: &str,
        sensitive_fields: &[&str],
    ) -> Result<()> {
        Ok(secure_delete(
            store,
            &mut self.audit,
            performed_by,
            table,
            record_id,
            sensitive_fields,
        )?)
    }
}

impl std::fmt::Debug for SecurityCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityCore")
            .field("acl_grants", &self.engine.acl_len())
            .field("audit_entries", &self.audit.count())
            .field("active_sessions", &self.sessions.session_count())
            .finish_non_exhaustive()
    }
}
