//! # haven-access: Role-based access decisions
//!
//! The decision engine consulted before any read or write of protected
//! records:
//! - **Role rules** (3 roles: PeerSpecialist, Supervisor, Admin)
//! - **Explicit ACL grants** extending role defaults per resource
//! - **Default deny** for everything the rules do not allow
//! - **Unauthorized-access handling** that raises a high-severity alert
//!   without ever blocking the Deny outcome
//!
//! ## Decision order
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  check_access(subject, resource, action)     │
//! │  ├─ Admin                      → allow       │
//! │  ├─ Supervisor + Read          → allow       │
//! │  ├─ Supervisor + other         → ACL lookup  │
//! │  ├─ PeerSpecialist + participant → caseload  │
//! │  ├─ PeerSpecialist + other     → ACL lookup  │
//! │  └─ everything else            → deny        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use haven_access::AccessDecisionEngine;
//! use haven_types::{Action, Resource, Role, Subject};
//!
//! let engine = AccessDecisionEngine::new();
//!
//! let admin = Subject::new("u1", Role::Admin, "org1");
//! assert!(engine.check_access(&admin, &Resource::new("assessment", "a1"), Action::Delete));
//!
//! let specialist = Subject::new("u2", Role::PeerSpecialist, "org1")
//!     .with_participants(["p1"]);
//! assert!(engine.check_access(&specialist, &Resource::participant("p1"), Action::Read));
//! assert!(!engine.check_access(&specialist, &Resource::participant("p2"), Action::Read));
//! ```

mod credentials;
mod engine;
mod store;

pub use credentials::{MfaVerification, PasswordValidation, validate_password, verify_mfa};
pub use engine::{AccessDenial, AccessDecisionEngine, UNAUTHORIZED_ACCESS_ATTEMPT};
pub use store::AclStore;
