//! # Haven
//!
//! Access-control and audit core for peer-recovery case management.
//!
//! Haven gates every touch of participant data behind a role-based
//! decision engine, encrypts sensitive fields before they reach storage,
//! and records an append-only audit trail of PHI access. This provides:
//!
//! - **Default deny** - No role rule and no explicit grant means no access
//! - **Caseload scoping** - Peer specialists see only assigned participants
//! - **Field-level encryption** - Plaintext PHI never reaches the datastore
//! - **Tamper-aware audit** - Append-only entries, denials always recorded
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SecurityCore                          │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │ Decision │   │ Crypto   │   │  Audit   │   │ Session  │  │
//! │  │ engine   │   │ gateway  │   │  log     │   │ monitor  │  │
//! │  │ (RBAC +  │   │ (KMS     │   │ (append  │   │ (15 min  │  │
//! │  │  ACL)    │   │  seam)   │   │  only)   │   │  idle)   │  │
//! │  └──────────┘   └──────────┘   └──────────┘   └──────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use haven::{Action, Resource, Role, SecurityCore, Subject};
//!
//! let mut core = SecurityCore::with_local_keys("phi-key-1");
//!
//! let specialist = Subject::new("sp-1", Role::PeerSpecialist, "org1")
//!     .with_participants(["p1"]);
//!
//! // Caseload membership allows; anything else is denied and recorded.
//! assert!(core.authorize(&specialist, &Resource::participant("p1"), Action::Read, "10.0.0.1", "dev-1"));
//! assert!(!core.authorize(&specialist, &Resource::participant("p2"), Action::Read, "10.0.0.1", "dev-1"));
//! assert_eq!(core.security_alerts(Some("sp-1"), None).len(), 1);
//! ```
//!
//! # Modules
//!
//! - **SDK Layer**: [`SecurityCore`] - Main API
//! - **Foundation**: Types, field encryption
//! - **Compliance**: Audit trail, alerts, secure deletion

mod core;
mod error;

// SDK Layer - Main API
pub use crate::core::SecurityCore;
pub use error::{HavenError, Result};

// Re-export core types
pub use haven_types::{
    AclEntry, Action, DataClass, PermissionSet, Resource, Role, Severity, Subject,
};

// Re-export field-level encryption
pub use haven_crypto::{CryptoError, EncryptionGateway, KeyService, LocalKeyService};

// Re-export audit trail types
pub use haven_audit::{
    AccessType, AuditDetail, AuditEntry, AuditError, AuditLog, AuditQuery, DataChangeEvent,
    LogType, PersistenceError, PhiAccessEvent, RecordStore, SecurityAlert, SecurityEventRecord,
    SessionStart,
};

// Re-export access-control surface
pub use haven_access::{
    AccessDecisionEngine, AccessDenial, AclStore, MfaVerification, PasswordValidation,
    UNAUTHORIZED_ACCESS_ATTEMPT, validate_password, verify_mfa,
};

// Re-export session monitoring
pub use haven_session::{SessionMonitor, SessionRecord};

// Re-export configuration
pub use haven_config::{ConfigError, ConfigLoader, HavenConfig, KmsConfig, SessionConfig};
