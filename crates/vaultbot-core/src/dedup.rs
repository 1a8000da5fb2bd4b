//! Duplicate-capture suppression.
//!
//! Telegram redelivers updates after long-poll timeouts and restarts,
//! so the same message can arrive twice. Each capture is fingerprinted
//! by its content together with the message's own timestamp, which
//! distinguishes a redelivery from a user genuinely sending the same
//! text again later. Seen fingerprints expire after a fixed window.
//!
//! Unlike the answer cache, re-checking a fingerprint never refreshes
//! its expiry, and stale entries are swept eagerly on every check so
//! the set cannot grow past one window's worth of captures.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::expiry::ExpiringMap;
use crate::hash::sha256_hex;

/// Remembers recently seen captures so redeliveries can be dropped.
pub struct DedupGuard {
    seen: ExpiringMap<String, ()>,
}

impl DedupGuard {
    pub fn new(window: Duration) -> Self {
        Self {
            seen: ExpiringMap::new(window),
        }
    }

    /// Record a capture and report whether it was already seen within
    /// the window. Returns `true` for a duplicate.
    ///
    /// Sweep, check, and record happen atomically, so two concurrent
    /// deliveries of the same capture agree on a single original.
    pub fn check_and_record(&self, content: &str, message_ts_unix: i64) -> bool {
        self.check_and_record_at(content, message_ts_unix, Instant::now())
    }

    pub fn check_and_record_at(&self, content: &str, message_ts_unix: i64, now: Instant) -> bool {
        let key = fingerprint(content, message_ts_unix);
        let inserted = self.seen.insert_if_absent_at(key, (), now);
        if !inserted {
            debug!(message_ts_unix, "duplicate capture dropped");
        }
        !inserted
    }

    /// Number of fingerprints currently remembered.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn fingerprint(content: &str, message_ts_unix: i64) -> String {
    sha256_hex(&format!("{content}:{message_ts_unix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_is_not_a_duplicate() {
        let guard = DedupGuard::new(Duration::from_secs(300));
        assert!(!guard.check_and_record("buy milk", 1_700_000_000));
    }

    #[test]
    fn redelivery_within_window_is_a_duplicate() {
        let guard = DedupGuard::new(Duration::from_secs(300));
        let t0 = Instant::now();
        assert!(!guard.check_and_record_at("buy milk", 1_700_000_000, t0));
        assert!(guard.check_and_record_at(
            "buy milk",
            1_700_000_000,
            t0 + Duration::from_secs(10)
        ));
    }

    #[test]
    fn same_content_different_timestamp_is_distinct() {
        let guard = DedupGuard::new(Duration::from_secs(300));
        let t0 = Instant::now();
        assert!(!guard.check_and_record_at("buy milk", 1_700_000_000, t0));
        assert!(!guard.check_and_record_at("buy milk", 1_700_000_042, t0));
    }

    #[test]
    fn fingerprint_expires_after_window() {
        let guard = DedupGuard::new(Duration::from_secs(300));
        let t0 = Instant::now();
        assert!(!guard.check_and_record_at("buy milk", 1_700_000_000, t0));
        assert!(!guard.check_and_record_at(
            "buy milk",
            1_700_000_000,
            t0 + Duration::from_secs(301)
        ));
    }

    #[test]
    fn duplicate_check_does_not_extend_expiry() {
        let guard = DedupGuard::new(Duration::from_secs(300));
        let t0 = Instant::now();
        assert!(!guard.check_and_record_at("buy milk", 1_700_000_000, t0));
        // Seen again mid-window; expiry stays anchored to the first sighting.
        assert!(guard.check_and_record_at(
            "buy milk",
            1_700_000_000,
            t0 + Duration::from_secs(200)
        ));
        assert!(!guard.check_and_record_at(
            "buy milk",
            1_700_000_000,
            t0 + Duration::from_secs(301)
        ));
    }

    #[test]
    fn concurrent_deliveries_keep_exactly_one_original() {
        use std::sync::Arc;
        use std::thread;

        let guard = Arc::new(DedupGuard::new(Duration::from_secs(300)));
        let now = Instant::now();
        let mut handles = vec![];

        for _ in 0..16 {
            let guard = Arc::clone(&guard);
            handles.push(thread::spawn(move || {
                guard.check_and_record_at("buy milk", 1_700_000_000, now)
            }));
        }

        let originals = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .filter(|duplicate| !duplicate)
            .count();
        assert_eq!(originals, 1);
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn stale_entries_are_swept_on_check() {
        let guard = DedupGuard::new(Duration::from_secs(300));
        let t0 = Instant::now();
        for i in 0..5 {
            guard.check_and_record_at("note", 1_700_000_000 + i, t0);
        }
        assert_eq!(guard.len(), 5);
        guard.check_and_record_at("fresh", 1_700_009_999, t0 + Duration::from_secs(301));
        assert_eq!(guard.len(), 1);
    }
}
