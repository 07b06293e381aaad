//! # haven-audit: PHI access and security-event audit trail
//!
//! Implements the tamper-aware audit log at the center of the Haven
//! security core:
//! - **PHI access records** — who touched whose data, why, and from where
//! - **Data-change records** — field-level before/after values, encrypted
//!   through the gateway so plaintext never reaches storage
//! - **Session records** — session lifecycle with write-once completion
//! - **Security events** — alerts raised, resolved by append, never mutated
//!
//! # Architecture
//!
//! ```text
//! AuditLog = {
//!     entries: Vec<AuditEntry>,        // Append-only
//!     log_phi_access(event) -> Uuid,
//!     log_data_change(gateway, event) -> Uuid,   // encrypts old/new
//!     start_session(info) -> Uuid,
//!     end_session(id, summary),        // write-once completion
//!     query(filter) -> Vec<&Entry>,
//!     export_json(filter) -> String,
//! }
//! ```
//!
//! The log is append-only: entries cannot be modified or deleted after
//! insertion. The single sanctioned exception is completing a session
//! entry's `session_end`/`session_summary`, which is write-once and
//! rejected once set.
//!
//! # Example
//!
//! ```
//! use haven_audit::{AuditLog, AuditQuery, PhiAccessEvent, AccessType};
//! use haven_types::DataClass;
//!
//! let mut log = AuditLog::new();
//!
//! log.log_phi_access(PhiAccessEvent {
//!     user_id: "u1".into(),
//!     participant_id: "p1".into(),
//!     access_type: AccessType::Read,
//!     data_class: DataClass::Phi,
//!     purpose: "intake review".into(),
//!     ip_address: "10.0.0.8".into(),
//!     device_id: "tablet-3".into(),
//! });
//!
//! let rows = log.query(&AuditQuery::default().with_user("u1"));
//! assert_eq!(rows.len(), 1);
//! ```

mod alerts;
mod entry;
mod log;
mod retire;

pub use alerts::{
    AlertRequest, SecurityAlert, generate_security_alert, get_security_alerts,
    resolve_security_alert,
};
pub use entry::{AccessType, AuditDetail, AuditEntry, LogType, SecurityEventRecord};
pub use log::{AuditLog, AuditQuery, DataChangeEvent, PhiAccessEvent, SessionStart};
pub use retire::{PersistenceError, RecordStore, secure_delete};

use thiserror::Error;
use uuid::Uuid;

/// Error type for audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit entry not found: {0}")]
    EntryNotFound(Uuid),

    #[error("entry {0} is not a session record")]
    NotASession(Uuid),

    #[error("session entry {0} is already closed")]
    SessionAlreadyClosed(Uuid),

    #[error("security alert not found: {0}")]
    AlertNotFound(Uuid),

    #[error(transparent)]
    Crypto(#[from] haven_crypto::CryptoError),

    #[error(transparent)]
    Persistence(#[from] retire::PersistenceError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
