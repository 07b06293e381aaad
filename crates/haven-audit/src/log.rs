//! Append-only audit log.

use crate::entry::{AccessType, AuditDetail, AuditEntry, LogType, SecurityEventRecord};
use crate::{AuditError, Result};
use chrono::{DateTime, Utc};
use haven_crypto::EncryptionGateway;
use haven_types::{DataClass, Severity};
use tracing::info;
use uuid::Uuid;

/// A PHI access about to be recorded.
///
/// These fields are metadata about the access (not the PHI payload), so
/// the entry they produce is stored in the clear.
#[derive(Debug, Clone)]
pub struct PhiAccessEvent {
    pub user_id: String,
    pub participant_id: String,
    pub access_type: AccessType,
    pub data_class: DataClass,
    pub purpose: String,
    pub ip_address: String,
    pub device_id: String,
}

/// A field-level mutation about to be recorded.
///
/// Values arrive in plaintext and are encrypted independently through the
/// gateway before the entry is constructed; the plaintext never reaches
/// the persisted record.
#[derive(Debug, Clone)]
pub struct DataChangeEvent {
    pub user_id: String,
    pub participant_id: Option<String>,
    pub table_name: String,
    pub record_id: String,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub change_reason: Option<String>,
}

/// Opening information for a service-session entry.
#[derive(Debug, Clone)]
pub struct SessionStart {
    pub user_id: String,
    pub participant_id: Option<String>,
    pub session_type: String,
}

/// Query filter for the audit log.
///
/// All fields are optional. When multiple fields are set, they are
/// combined with AND logic. Use builder methods for construction.
#[derive(Debug, Default, Clone)]
pub struct AuditQuery {
    pub user_id: Option<String>,
    pub participant_id: Option<String>,
    pub log_type: Option<LogType>,
    pub time_from: Option<DateTime<Utc>>,
    pub time_to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Filter by the user an entry is attributed to.
    pub fn with_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// Filter by the participant whose data is involved.
    pub fn with_participant(mut self, participant_id: &str) -> Self {
        self.participant_id = Some(participant_id.to_string());
        self
    }

    /// Filter by entry kind.
    pub fn with_log_type(mut self, log_type: LogType) -> Self {
        self.log_type = Some(log_type);
        self
    }

    /// Filter to entries within a time range (inclusive).
    pub fn with_time_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.time_from = Some(from);
        self.time_to = Some(to);
        self
    }

    /// Limit the number of results returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Append-only log of PHI access, data changes, sessions, and security
/// events.
///
/// The log enforces append-only semantics structurally: the API provides
/// no mutation or deletion methods. The one exception is
/// [`AuditLog::end_session`], which completes a session entry's
/// `session_end`/`session_summary` exactly once and errors on any second
/// attempt.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    /// Create a new empty audit log.
    pub fn new() -> Self {
        Self::default()
    }

    fn append(&mut self, user_id: String, participant_id: Option<String>, detail: AuditDetail) -> Uuid {
        let count_before = self.entries.len();

        let id = Uuid::new_v4();
        self.entries.push(AuditEntry {
            id,
            user_id,
            participant_id,
            timestamp: Utc::now(),
            detail,
        });

        // Post-condition: exactly one entry was added
        assert_eq!(
            self.entries.len(),
            count_before + 1,
            "audit append must increase entry count by exactly 1"
        );

        id
    }

    /// Record an access to protected health information.
    pub fn log_phi_access(&mut self, event: PhiAccessEvent) -> Uuid {
        info!(
            user = %event.user_id,
            participant = %event.participant_id,
            access = %event.access_type.as_str(),
            "PHI access recorded"
        );

        self.append(
            event.user_id,
            Some(event.participant_id),
            AuditDetail::PhiAccess {
                access_type: event.access_type,
                data_type: event.data_class,
                access_purpose: event.purpose,
                ip_address: event.ip_address,
                device_id: event.device_id,
            },
        )
    }

    /// Record a field-level mutation, encrypting the before and after
    /// values through the gateway.
    ///
    /// Each value is encrypted independently under the PHI field policy.
    /// Encryption failures propagate; no partial entry is written.
    pub fn log_data_change(
        &mut self,
        gateway: &EncryptionGateway,
        event: DataChangeEvent,
    ) -> Result<Uuid> {
        let old_value_encrypted = match &event.old_value {
            Some(value) => Some(gateway.encrypt_field(value)?),
            None => None,
        };
        let new_value_encrypted = match &event.new_value {
            Some(value) => Some(gateway.encrypt_field(value)?),
            None => None,
        };

        Ok(self.append(
            event.user_id,
            event.participant_id,
            AuditDetail::DataChange {
                table_name: event.table_name,
                record_id: event.record_id,
                field_name: event.field_name,
                old_value_encrypted,
                new_value_encrypted,
                change_reason: event.change_reason,
            },
        ))
    }

    /// Record a security event. Used by the alert service and secure
    /// deletion; hosts can also record events directly.
    pub fn log_security_event(
        &mut self,
        user_id: impl Into<String>,
        participant_id: Option<String>,
        record: SecurityEventRecord,
    ) -> Uuid {
        self.append(
            user_id.into(),
            participant_id,
            AuditDetail::SecurityEvent { record },
        )
    }

    /// Open a service-session entry with `session_start = now`.
    ///
    /// Returns the entry id, which addresses the same record in
    /// [`AuditLog::end_session`].
    pub fn start_session(&mut self, info: SessionStart) -> Uuid {
        let start = Utc::now();
        self.append(
            info.user_id,
            info.participant_id,
            AuditDetail::Session {
                session_type: info.session_type,
                session_start: start,
                session_end: None,
                session_summary: None,
            },
        )
    }

    /// Complete the session entry created by [`AuditLog::start_session`].
    ///
    /// Sets `session_end = now` and the summary on the same entry,
    /// matched by id and session type. Write-once: a second completion
    /// fails with [`AuditError::SessionAlreadyClosed`].
    pub fn end_session(&mut self, entry_id: Uuid, summary: Option<String>) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or(AuditError::EntryNotFound(entry_id))?;

        match &mut entry.detail {
            AuditDetail::Session {
                session_end,
                session_summary,
                ..
            } => {
                if session_end.is_some() {
                    return Err(AuditError::SessionAlreadyClosed(entry_id));
                }
                *session_end = Some(Utc::now());
                *session_summary = summary;
                Ok(())
            }
            _ => Err(AuditError::NotASession(entry_id)),
        }
    }

    /// Query entries matching the given filter.
    ///
    /// All filter fields use AND logic. An empty query returns all
    /// entries, in insertion (chronological) order.
    pub fn query(&self, filter: &AuditQuery) -> Vec<&AuditEntry> {
        let mut results: Vec<&AuditEntry> = self
            .entries
            .iter()
            .filter(|entry| Self::matches_filter(entry, filter))
            .collect();

        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }

        results
    }

    /// Look up a single entry by id.
    pub fn get_entry(&self, entry_id: Uuid) -> Option<&AuditEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    /// All entries recorded since the given timestamp (inclusive).
    pub fn entries_since(&self, since: DateTime<Utc>) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.timestamp >= since)
            .collect()
    }

    /// Total number of entries in the log.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Export filtered entries as a JSON array of flat rows.
    pub fn export_json(&self, filter: &AuditQuery) -> Result<String> {
        let entries = self.query(filter);
        serde_json::to_string_pretty(&entries).map_err(AuditError::from)
    }

    /// Highest severity among recorded security events, if any. Used by
    /// hosts to decide whether a review pass is needed.
    pub fn highest_security_severity(&self) -> Option<Severity> {
        self.entries
            .iter()
            .filter_map(|e| match &e.detail {
                AuditDetail::SecurityEvent { record } => Some(record.severity),
                _ => None,
            })
            .max()
    }

    fn matches_filter(entry: &AuditEntry, filter: &AuditQuery) -> bool {
        if let Some(ref user_id) = filter.user_id {
            if entry.user_id != *user_id {
                return false;
            }
        }

        if let Some(ref participant_id) = filter.participant_id {
            match &entry.participant_id {
                Some(pid) if pid == participant_id => {}
                _ => return false,
            }
        }

        if let Some(log_type) = filter.log_type {
            if entry.log_type() != log_type {
                return false;
            }
        }

        // Time range filter (inclusive)
        if let Some(from) = filter.time_from {
            if entry.timestamp < from {
                return false;
            }
        }
        if let Some(to) = filter.time_to {
            if entry.timestamp > to {
                return false;
            }
        }

        true
    }
}
