//! Secure deletion of retired sensitive records.
//!
//! Before a record is physically deleted, every sensitive field is
//! overwritten twice with independent random values so the final stored
//! state contains no recoverable plaintext, then the row is deleted and
//! the deletion is recorded as a security event.

use crate::entry::SecurityEventRecord;
use crate::log::AuditLog;
use crate::Result;
use haven_types::Severity;
use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;
use tracing::info;

/// Event type recorded for a completed secure deletion.
pub const SECURE_DELETION: &str = "SECURE_DELETION";

/// Length of each random overwrite value.
const OVERWRITE_LEN: usize = 32;

/// Number of independent overwrite passes per field.
const OVERWRITE_PASSES: usize = 2;

/// Datastore failure surfaced by a [`RecordStore`] implementation.
#[derive(Debug, Error)]
#[error("datastore failure during {operation}: {detail}")]
pub struct PersistenceError {
    pub operation: &'static str,
    pub detail: String,
}

impl PersistenceError {
    pub fn new(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }
}

/// The datastore seam used by secure deletion.
///
/// The storage interface exposes exactly the two operations the routine
/// needs; there is deliberately no read-back or update surface here.
pub trait RecordStore {
    /// Overwrite a single field of a record with the given value.
    fn overwrite_field(
        &mut self,
        table: &str,
        record_id: &str,
        field: &str,
        value: &str,
    ) -> std::result::Result<(), PersistenceError>;

    /// Physically delete a record.
    fn delete_record(
        &mut self,
        table: &str,
        record_id: &str,
    ) -> std::result::Result<(), PersistenceError>;
}

fn random_overwrite_value() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(OVERWRITE_LEN)
        .map(char::from)
        .collect()
}

/// Overwrite-then-delete a retired sensitive record.
///
/// For each named field, performs two overwrites with independently
/// generated random strings, then issues one physical delete, then
/// records a [`SECURE_DELETION`] security event. The steps run strictly
/// in that order and a failure at any step aborts without continuing.
/// An empty field list degenerates to zero overwrites and one delete.
pub fn secure_delete(
    store: &mut dyn RecordStore,
    log: &mut AuditLog,
    performed_by: &str,
    table: &str,
    record_id: &str,
    sensitive_fields: &[&str],
) -> Result<()> {
    for _ in 0..OVERWRITE_PASSES {
        for field in sensitive_fields {
            store.overwrite_field(table, record_id, field, &random_overwrite_value())?;
        }
    }

    store.delete_record(table, record_id)?;

    info!(table, record_id, fields = sensitive_fields.len(), "record securely deleted");

    log.log_security_event(
        performed_by,
        None,
        SecurityEventRecord {
            event_type: SECURE_DELETION.to_string(),
            severity: Severity::Medium,
            event_description: format!(
                "securely deleted {table}/{record_id} ({} sensitive fields overwritten)",
                sensitive_fields.len()
            ),
        },
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{AuditDetail, LogType};
    use crate::log::AuditQuery;

    /// Operation trace for asserting call ordering.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Overwrite {
            field: String,
            value: String,
        },
        Delete,
    }

    #[derive(Default)]
    struct MockStore {
        ops: Vec<Op>,
        fail_on_overwrite: Option<usize>,
        fail_on_delete: bool,
    }

    impl RecordStore for MockStore {
        fn overwrite_field(
            &mut self,
            _table: &str,
            _record_id: &str,
            field: &str,
            value: &str,
        ) -> std::result::Result<(), PersistenceError> {
            let overwrites_so_far = self
                .ops
                .iter()
                .filter(|op| matches!(op, Op::Overwrite { .. }))
                .count();
            if self.fail_on_overwrite == Some(overwrites_so_far) {
                return Err(PersistenceError::new("overwrite", "disk full"));
            }
            self.ops.push(Op::Overwrite {
                field: field.to_string(),
                value: value.to_string(),
            });
            Ok(())
        }

        fn delete_record(
            &mut self,
            _table: &str,
            _record_id: &str,
        ) -> std::result::Result<(), PersistenceError> {
            if self.fail_on_delete {
                return Err(PersistenceError::new("delete", "record locked"));
            }
            self.ops.push(Op::Delete);
            Ok(())
        }
    }

    #[test]
    fn test_two_overwrites_per_field_then_one_delete() {
        let mut store = MockStore::default();
        let mut log = AuditLog::new();

        secure_delete(
            &mut store,
            &mut log,
            "admin-1",
            "participants",
            "p1",
            &["ssn", "diagnosis"],
        )
        .expect("secure delete");

        let overwritten: Vec<&str> = store
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Overwrite { field, .. } => Some(field.as_str()),
                Op::Delete => None,
            })
            .collect();
        assert_eq!(
            overwritten,
            vec!["ssn", "diagnosis", "ssn", "diagnosis"],
            "two passes over two fields"
        );
        assert_eq!(store.ops.last(), Some(&Op::Delete));
        assert_eq!(
            store.ops.iter().filter(|op| matches!(op, Op::Delete)).count(),
            1
        );
    }

    #[test]
    fn test_overwrite_values_are_independent() {
        let mut store = MockStore::default();
        let mut log = AuditLog::new();

        secure_delete(&mut store, &mut log, "admin-1", "participants", "p1", &["ssn"])
            .expect("secure delete");

        let values: Vec<&String> = store
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Overwrite { value, .. } => Some(value),
                Op::Delete => None,
            })
            .collect();
        assert_eq!(values.len(), 2);
        assert_ne!(values[0], values[1], "each pass draws a fresh value");
        assert_eq!(values[0].len(), OVERWRITE_LEN);
    }

    #[test]
    fn test_empty_field_list_is_delete_only() {
        let mut store = MockStore::default();
        let mut log = AuditLog::new();

        secure_delete(&mut store, &mut log, "admin-1", "participants", "p1", &[])
            .expect("secure delete");

        assert_eq!(store.ops, vec![Op::Delete]);
        assert_eq!(log.count(), 1, "deletion still audited");
    }

    #[test]
    fn test_overwrite_failure_aborts_before_delete() {
        let mut store = MockStore {
            fail_on_overwrite: Some(1),
            ..MockStore::default()
        };
        let mut log = AuditLog::new();

        let result = secure_delete(
            &mut store,
            &mut log,
            "admin-1",
            "participants",
            "p1",
            &["ssn", "diagnosis"],
        );

        assert!(result.is_err());
        assert!(
            !store.ops.contains(&Op::Delete),
            "delete must not run after a failed overwrite"
        );
        assert_eq!(log.count(), 0, "no audit entry for an aborted deletion");
    }

    #[test]
    fn test_delete_failure_skips_audit() {
        let mut store = MockStore {
            fail_on_delete: true,
            ..MockStore::default()
        };
        let mut log = AuditLog::new();

        let result = secure_delete(&mut store, &mut log, "admin-1", "participants", "p1", &["ssn"]);

        assert!(result.is_err());
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_deletion_recorded_as_security_event() {
        let mut store = MockStore::default();
        let mut log = AuditLog::new();

        secure_delete(&mut store, &mut log, "admin-1", "participants", "p1", &["ssn"])
            .expect("secure delete");

        let events = log.query(&AuditQuery::default().with_log_type(LogType::SecurityEvent));
        assert_eq!(events.len(), 1);
        match &events[0].detail {
            AuditDetail::SecurityEvent { record } => {
                assert_eq!(record.event_type, SECURE_DELETION);
                assert!(record.event_description.contains("participants/p1"));
            }
            other => panic!("expected SecurityEvent, got {other:?}"),
        }
        assert_eq!(events[0].user_id, "admin-1");
    }
}
