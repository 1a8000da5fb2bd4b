//! Per-user cooldown gate (admission control).
//!
//! Each user has at most one stored timestamp: the moment of their last
//! admitted query. Admission and timestamp update happen together under
//! a single write lock, so two concurrent attempts from the same user
//! cannot both be admitted within one cooldown window.
//!
//! A denied attempt does NOT move the stored timestamp -- the user may
//! retry once the original window lapses, rather than having the window
//! reset on every attempt.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::debug;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The query may proceed; the attempt was recorded.
    Allowed,
    /// Too soon; retry after `wait_secs`.
    Denied {
        /// Whole seconds until the window lapses, rounded up.
        wait_secs: u64,
    },
}

impl Admission {
    /// Whether the check admitted the request.
    pub fn is_allowed(self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// Enforces a minimum spacing between admitted queries per user.
pub struct CooldownGate {
    /// Last admitted-query timestamp per user.
    last_query: RwLock<HashMap<i64, Instant>>,
    /// Required spacing between admissions.
    cooldown: Duration,
}

impl CooldownGate {
    /// Create a gate with the given cooldown window.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            last_query: RwLock::new(HashMap::new()),
            cooldown,
        }
    }

    /// Atomic check-and-record against `Instant::now()`.
    pub fn check_and_record(&self, user_id: i64) -> Admission {
        self.check_and_record_at(user_id, Instant::now())
    }

    /// Atomic check-and-record at an explicit instant.
    ///
    /// Allowed when the user has no prior record or the window has
    /// lapsed; the timestamp is then overwritten with `now`. On denial
    /// the stored timestamp is left untouched.
    pub fn check_and_record_at(&self, user_id: i64, now: Instant) -> Admission {
        let mut last_query = self.last_query.write().expect("cooldown lock poisoned");

        if let Some(last) = last_query.get(&user_id) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.cooldown {
                let remaining = self.cooldown - elapsed;
                // Round up so a user told to wait N seconds is
                // guaranteed admission after waiting N.
                let wait_secs = remaining.as_secs()
                    + u64::from(remaining.subsec_nanos() > 0);
                debug!(user_id, wait_secs, "query denied by cooldown");
                return Admission::Denied { wait_secs };
            }
        }

        last_query.insert(user_id, now);
        Admission::Allowed
    }

    /// Number of users with a recorded admission.
    pub fn tracked_users(&self) -> usize {
        self.last_query.read().expect("cooldown lock poisoned").len()
    }
}
