//! Clock-relative expiring map.
//!
//! Generic keyed store where every entry remembers its insertion time
//! and expires after a fixed TTL. Shared by the answer cache
//! (expire-on-read) and the dedup guard (eager sweep). Entries are
//! immutable after insertion; a later insert with the same key replaces
//! the entry and restarts its clock.
//!
//! Thread-safe via `RwLock<HashMap>`; all public methods take `&self`.
//! There is no size bound -- growth is limited only by TTL turnover.
//!
//! Every operation has an `_at` variant taking an explicit [`Instant`]
//! so expiry logic is testable without sleeping.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// A keyed store with per-entry insertion time and TTL-based expiry.
pub struct ExpiringMap<K, V> {
    entries: RwLock<HashMap<K, (V, Instant)>>,
    ttl: Duration,
}

impl<K, V> ExpiringMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty map whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert or replace an entry, stamping it with `Instant::now()`.
    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Insert or replace an entry with an explicit insertion time.
    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        let mut entries = self.entries.write().expect("expiring map lock poisoned");
        entries.insert(key, (value, now));
    }

    /// Look up a live entry; a stale entry is deleted and reported absent.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Expire-on-read lookup at an explicit instant.
    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut entries = self.entries.write().expect("expiring map lock poisoned");
        match entries.get(key) {
            Some((value, inserted)) if now.duration_since(*inserted) <= self.ttl => {
                Some(value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert the entry unless a live one already exists for the key.
    ///
    /// Sweep, check, and insert run under one write-lock acquisition,
    /// so concurrent callers with the same key agree on exactly one
    /// winner. Returns `true` when the entry was inserted. A losing
    /// call leaves the existing entry's timestamp untouched.
    pub fn insert_if_absent(&self, key: K, value: V) -> bool {
        self.insert_if_absent_at(key, value, Instant::now())
    }

    /// Atomic insert-if-absent at an explicit instant.
    pub fn insert_if_absent_at(&self, key: K, value: V, now: Instant) -> bool {
        let mut entries = self.entries.write().expect("expiring map lock poisoned");
        entries.retain(|_, (_, inserted)| now.duration_since(*inserted) <= self.ttl);
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, (value, now));
        true
    }

    /// Whether a live entry exists, without deleting stale ones or
    /// refreshing timestamps.
    pub fn contains_at(&self, key: &K, now: Instant) -> bool {
        let entries = self.entries.read().expect("expiring map lock poisoned");
        entries
            .get(key)
            .is_some_and(|(_, inserted)| now.duration_since(*inserted) <= self.ttl)
    }

    /// Purge every entry older than the TTL. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Eager purge at an explicit instant.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.write().expect("expiring map lock poisoned");
        let before = entries.len();
        entries.retain(|_, (_, inserted)| now.duration_since(*inserted) <= self.ttl);
        before - entries.len()
    }

    /// Number of entries currently stored, live or not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().expect("expiring map lock poisoned").len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("expiring map lock poisoned")
            .clear();
    }
}
