//! # haven-session: Inactivity tracking and the 15-minute timeout rule
//!
//! Tracks per-session last-activity timestamps and decides when a session
//! has timed out. Detection is polled, not pushed: the host application
//! periodically invokes [`SessionMonitor::check_session_timeout`] or
//! sweeps with [`SessionMonitor::cleanup_expired_sessions`]; there is no
//! internal timer.
//!
//! The timeout predicate fails closed: a session id that does not exist
//! is reported as timed out.
//!
//! ## Example
//!
//! ```
//! use haven_session::SessionMonitor;
//!
//! let mut monitor = SessionMonitor::new();
//! let session_id = monitor.create_session("u1");
//!
//! assert!(!monitor.check_session_timeout(&session_id));
//! assert!(monitor.update_session_activity(&session_id));
//!
//! monitor.terminate_session(&session_id);
//! assert!(monitor.check_session_timeout(&session_id)); // fail-closed
//! ```

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Inactivity window after which a session times out: 15 minutes.
const SESSION_TIMEOUT_MS: u64 = 900_000;

/// Length of the random suffix in generated session ids.
const SESSION_ID_SUFFIX_LEN: usize = 9;

/// A tracked session.
///
/// `last_activity` moves only forward in wall-clock terms, and only
/// through [`SessionMonitor::update_session_activity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Tracks per-session activity and computes the timeout predicate.
///
/// Owned by a single service instance; hosts sharing it across threads
/// wrap it in a mutex so activity updates and sweeps stay atomic.
#[derive(Debug, Default)]
pub struct SessionMonitor {
    sessions: HashMap<String, SessionRecord>,
}

impl SessionMonitor {
    /// Create a monitor with no tracked sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new session and return its id.
    ///
    /// Ids are time-based (epoch milliseconds) plus a random alphanumeric
    /// suffix, unique across concurrent creations within the same
    /// millisecond.
    pub fn create_session(&mut self, user_id: &str) -> String {
        let now = Utc::now();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_SUFFIX_LEN)
            .map(char::from)
            .collect();
        let session_id = format!("{}-{}", now.timestamp_millis(), suffix);

        info!(user = %user_id, session = %session_id, "session created");

        self.sessions.insert(
            session_id.clone(),
            SessionRecord {
                session_id: session_id.clone(),
                user_id: user_id.to_string(),
                created_at: now,
                last_activity: now,
            },
        );

        session_id
    }

    /// Refresh a session's last-activity timestamp to now.
    ///
    /// Returns false if the session does not exist.
    pub fn update_session_activity(&mut self, session_id: &str) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(record) => {
                record.last_activity = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Whether a session has timed out.
    ///
    /// True when the session does not exist (fail-closed) or when
    /// `now - last_activity >= 15 minutes`; the boundary is inclusive,
    /// so a session is timed out at exactly 15:00 elapsed.
    pub fn check_session_timeout(&self, session_id: &str) -> bool {
        match self.sessions.get(session_id) {
            Some(record) => Self::timed_out(record, Utc::now()),
            None => true,
        }
    }

    /// Stop tracking a session. No-op if absent.
    pub fn terminate_session(&mut self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            info!(session = %session_id, "session terminated");
        }
    }

    /// Remove every timed-out session and return how many were removed.
    ///
    /// Intended to be invoked periodically by an external scheduler.
    pub fn cleanup_expired_sessions(&mut self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !Self::timed_out(record, now));
        let removed = before - self.sessions.len();

        if removed > 0 {
            info!(removed, "expired sessions swept");
        }
        removed
    }

    /// Snapshot of a tracked session, if it exists.
    pub fn get_session(&self, session_id: &str) -> Option<&SessionRecord> {
        self.sessions.get(session_id)
    }

    /// Number of tracked sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The inactivity window in milliseconds: 900 000 (15 minutes).
    pub fn session_timeout_ms() -> u64 {
        SESSION_TIMEOUT_MS
    }

    fn timeout_window() -> Duration {
        Duration::milliseconds(SESSION_TIMEOUT_MS as i64)
    }

    fn timed_out(record: &SessionRecord, now: DateTime<Utc>) -> bool {
        now - record.last_activity >= Self::timeout_window()
    }

    /// Test hook: rewind a session's last-activity timestamp.
    #[cfg(test)]
    fn backdate_last_activity(&mut self, session_id: &str, by: Duration) {
        if let Some(record) = self.sessions.get_mut(session_id) {
            record.last_activity -= by;
        }
    }
}
