//! Audit entry model.
//!
//! Entries serialize to the flat persisted row shape: common columns plus
//! a `log_type` discriminant selecting one of four per-type column sets.

use chrono::{DateTime, Utc};
use haven_types::{DataClass, Severity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How PHI was accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Read,
    Write,
    Delete,
}

impl AccessType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessType::Read => "read",
            AccessType::Write => "write",
            AccessType::Delete => "delete",
        }
    }
}

/// Discriminant over the four entry kinds, used for query filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    PhiAccess,
    DataChange,
    Session,
    SecurityEvent,
}

/// A security event's payload, shared between the entry model and the
/// alert service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityEventRecord {
    pub event_type: String,
    pub severity: Severity,
    pub event_description: String,
}

/// Per-type payload of an audit entry.
///
/// Internally tagged on `log_type` so a serialized entry is one flat row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "log_type", rename_all = "snake_case")]
pub enum AuditDetail {
    /// A read/write/delete of protected health information. These fields
    /// are metadata about the access, not the PHI payload itself, so they
    /// are stored in the clear.
    PhiAccess {
        access_type: AccessType,
        data_type: DataClass,
        access_purpose: String,
        ip_address: String,
        device_id: String,
    },

    /// A field-level mutation. Old and new values arrive here already
    /// encrypted; constructors in [`crate::AuditLog`] enforce that.
    ///
    /// Both value columns are always present on the serialized row. An
    /// insert has no prior value and a delete has no new value; the
    /// missing side is an explicit null, never an omitted column.
    DataChange {
        table_name: String,
        record_id: String,
        field_name: String,
        old_value_encrypted: Option<String>,
        new_value_encrypted: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        change_reason: Option<String>,
    },

    /// A service-session lifecycle record. `session_end` and
    /// `session_summary` are completed write-once by `end_session`.
    Session {
        session_type: String,
        session_start: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_end: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        session_summary: Option<String>,
    },

    /// A security event, including raised and resolved alerts.
    SecurityEvent {
        #[serde(flatten)]
        record: SecurityEventRecord,
    },
}

impl AuditDetail {
    pub fn log_type(&self) -> LogType {
        match self {
            AuditDetail::PhiAccess { .. } => LogType::PhiAccess,
            AuditDetail::DataChange { .. } => LogType::DataChange,
            AuditDetail::Session { .. } => LogType::Session,
            AuditDetail::SecurityEvent { .. } => LogType::SecurityEvent,
        }
    }
}

/// A single audit entry.
///
/// Once appended to the log an entry is immutable, except for the
/// write-once session completion described on [`AuditDetail::Session`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// User the entry is attributed to.
    pub user_id: String,
    /// Participant whose data is involved, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
    /// When the entry was recorded (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,
    /// Per-type payload.
    #[serde(flatten)]
    pub detail: AuditDetail,
}

impl AuditEntry {
    pub fn log_type(&self) -> LogType {
        self.detail.log_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AccessType::Read, "read")]
    #[test_case(AccessType::Write, "write")]
    #[test_case(AccessType::Delete, "delete")]
    fn test_access_type_wire_name(access: AccessType, expected: &str) {
        assert_eq!(access.as_str(), expected);
        let json = serde_json::to_string(&access).expect("serialize");
        assert_eq!(json, format!("\"{expected}\""));
    }

    #[test_case(LogType::PhiAccess, "phi_access")]
    #[test_case(LogType::DataChange, "data_change")]
    #[test_case(LogType::Session, "session")]
    #[test_case(LogType::SecurityEvent, "security_event")]
    fn test_log_type_wire_name(log_type: LogType, expected: &str) {
        let json = serde_json::to_string(&log_type).expect("serialize");
        assert_eq!(json, format!("\"{expected}\""));
    }

    #[test]
    fn test_data_change_row_always_carries_value_columns() {
        // An insert: no prior value. The column must still be present,
        // as an explicit null, so the row shape stays fixed.
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            participant_id: Some("p1".into()),
            timestamp: Utc::now(),
            detail: AuditDetail::DataChange {
                table_name: "participants".into(),
                record_id: "p1".into(),
                field_name: "phone".into(),
                old_value_encrypted: None,
                new_value_encrypted: Some("b64:new".into()),
                change_reason: None,
            },
        };

        let row: serde_json::Value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(
            row.get("old_value_encrypted"),
            Some(&serde_json::Value::Null),
            "insert side is an explicit null column, not an omitted one"
        );
        assert_eq!(row["new_value_encrypted"], "b64:new");

        // A delete mirrors it: new side null, old side populated.
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            participant_id: Some("p1".into()),
            timestamp: Utc::now(),
            detail: AuditDetail::DataChange {
                table_name: "participants".into(),
                record_id: "p1".into(),
                field_name: "phone".into(),
                old_value_encrypted: Some("b64:old".into()),
                new_value_encrypted: None,
                change_reason: None,
            },
        };

        let row: serde_json::Value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(row["old_value_encrypted"], "b64:old");
        assert_eq!(row.get("new_value_encrypted"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn test_phi_access_row_is_flat() {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            participant_id: Some("p1".into()),
            timestamp: Utc::now(),
            detail: AuditDetail::PhiAccess {
                access_type: AccessType::Read,
                data_type: DataClass::Phi,
                access_purpose: "assessment".into(),
                ip_address: "10.0.0.1".into(),
                device_id: "d1".into(),
            },
        };

        let row: serde_json::Value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(row["log_type"], "phi_access");
        assert_eq!(row["user_id"], "u1");
        assert_eq!(row["participant_id"], "p1");
        assert_eq!(row["access_type"], "read");
        assert_eq!(row["data_type"], "phi");
        assert_eq!(row["access_purpose"], "assessment");
        assert_eq!(row["ip_address"], "10.0.0.1");
        assert_eq!(row["device_id"], "d1");
    }

    #[test]
    fn test_security_event_row_is_flat() {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            participant_id: None,
            timestamp: Utc::now(),
            detail: AuditDetail::SecurityEvent {
                record: SecurityEventRecord {
                    event_type: "UNAUTHORIZED_ACCESS_ATTEMPT".into(),
                    severity: Severity::High,
                    event_description: "denied".into(),
                },
            },
        };

        let row: serde_json::Value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(row["log_type"], "security_event");
        assert_eq!(row["event_type"], "UNAUTHORIZED_ACCESS_ATTEMPT");
        assert_eq!(row["severity"], "high");
        assert_eq!(row["event_description"], "denied");
        assert!(row.get("participant_id").is_none(), "optional column omitted");
    }

    #[test]
    fn test_session_row_omits_open_fields() {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            participant_id: Some("p1".into()),
            timestamp: Utc::now(),
            detail: AuditDetail::Session {
                session_type: "peer_support".into(),
                session_start: Utc::now(),
                session_end: None,
                session_summary: None,
            },
        };

        let row: serde_json::Value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(row["log_type"], "session");
        assert!(row.get("session_end").is_none());
        assert!(row.get("session_summary").is_none());
    }

    #[test]
    fn test_row_round_trips() {
        let entry = AuditEntry {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            participant_id: None,
            timestamp: Utc::now(),
            detail: AuditDetail::DataChange {
                table_name: "participants".into(),
                record_id: "p1".into(),
                field_name: "phone".into(),
                old_value_encrypted: Some("b64:old".into()),
                new_value_encrypted: Some("b64:new".into()),
                change_reason: None,
            },
        };

        let json = serde_json::to_string(&entry).expect("serialize");
        let back: AuditEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, entry);
        assert_eq!(back.log_type(), LogType::DataChange);
    }
}
