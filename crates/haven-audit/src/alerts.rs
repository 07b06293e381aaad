//! Security alert generation, enumeration, and append-only resolution.
//!
//! Alerts are not stored separately: every alert is a `SecurityEvent`
//! entry in the audit log, and the list of alerts is reconstructed from
//! those entries at read time. Resolving an alert appends a new
//! `ALERT_RESOLVED` event referencing the original; the original entry is
//! never mutated.

use crate::entry::{AuditDetail, SecurityEventRecord};
use crate::log::AuditLog;
use crate::{AuditError, Result};
use chrono::{DateTime, Utc};
use haven_types::Severity;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Event type recorded when an alert is resolved.
pub const ALERT_RESOLVED: &str = "ALERT_RESOLVED";

/// A security alert to be raised.
#[derive(Debug, Clone)]
pub struct AlertRequest {
    pub user_id: String,
    pub severity: Severity,
    pub alert_type: String,
    pub description: String,
    /// Caller's view of whether the alert needs follow-up. Returned on
    /// the generated alert but not persisted; enumeration re-derives the
    /// flag from severity.
    pub requires_action: bool,
}

/// A security alert, either freshly generated or reconstructed from the
/// audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAlert {
    pub id: Uuid,
    pub user_id: String,
    pub severity: Severity,
    pub alert_type: String,
    pub description: String,
    pub requires_action: bool,
    pub timestamp: DateTime<Utc>,
}

/// Raise a security alert and persist it as a `SecurityEvent` entry.
///
/// Returns the alert value with a fresh id and `timestamp = now`. The
/// returned `requires_action` is the caller-supplied flag; readers of
/// [`get_security_alerts`] will instead see the severity-derived flag.
pub fn generate_security_alert(log: &mut AuditLog, request: AlertRequest) -> SecurityAlert {
    warn!(
        user = %request.user_id,
        severity = %request.severity,
        alert_type = %request.alert_type,
        "security alert raised"
    );

    let id = log.log_security_event(
        request.user_id.clone(),
        None,
        SecurityEventRecord {
            event_type: request.alert_type.clone(),
            severity: request.severity,
            event_description: request.description.clone(),
        },
    );

    let timestamp = log
        .get_entry(id)
        .map_or_else(Utc::now, |entry| entry.timestamp);

    SecurityAlert {
        id,
        user_id: request.user_id,
        severity: request.severity,
        alert_type: request.alert_type,
        description: request.description,
        requires_action: request.requires_action,
        timestamp,
    }
}

/// Enumerate alerts reconstructed from stored `SecurityEvent` entries.
///
/// `requires_action` is re-derived from severity at read time
/// (High/Critical imply true); the flag passed to
/// [`generate_security_alert`] is not persisted and does not survive the
/// round trip.
pub fn get_security_alerts(
    log: &AuditLog,
    user_id: Option<&str>,
    severity: Option<Severity>,
) -> Vec<SecurityAlert> {
    let mut query = crate::log::AuditQuery::default()
        .with_log_type(crate::entry::LogType::SecurityEvent);
    if let Some(user) = user_id {
        query = query.with_user(user);
    }

    log.query(&query)
        .into_iter()
        .filter_map(|entry| match &entry.detail {
            AuditDetail::SecurityEvent { record } => Some(SecurityAlert {
                id: entry.id,
                user_id: entry.user_id.clone(),
                severity: record.severity,
                alert_type: record.event_type.clone(),
                description: record.event_description.clone(),
                requires_action: record.severity.requires_action(),
                timestamp: entry.timestamp,
            }),
            _ => None,
        })
        .filter(|alert| severity.is_none_or(|s| alert.severity == s))
        .collect()
}

/// Resolve an alert by appending an `ALERT_RESOLVED` event referencing
/// it. The original entry is never mutated.
///
/// # Errors
///
/// [`AuditError::AlertNotFound`] if `alert_id` does not name a stored
/// `SecurityEvent` entry.
pub fn resolve_security_alert(
    log: &mut AuditLog,
    alert_id: Uuid,
    resolved_by: &str,
    resolution: &str,
) -> Result<Uuid> {
    let is_alert = matches!(
        log.get_entry(alert_id).map(|e| &e.detail),
        Some(AuditDetail::SecurityEvent { .. })
    );
    if !is_alert {
        return Err(AuditError::AlertNotFound(alert_id));
    }

    Ok(log.log_security_event(
        resolved_by,
        None,
        SecurityEventRecord {
            event_type: ALERT_RESOLVED.to_string(),
            severity: Severity::Low,
            event_description: format!("alert {alert_id} resolved: {resolution}"),
        },
    ))
}
