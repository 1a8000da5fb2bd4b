//! Short-TTL answer cache keyed by normalized question text.
//!
//! Repeating the same question within the TTL returns the stored
//! answer without an engine call or budget charge. Keys are scoped per
//! user so two users asking the same question never share entries.

use std::time::{Duration, Instant};

use crate::expiry::ExpiringMap;
use crate::hash::sha256_hex;

/// A previously computed answer, stored with the metadata needed to
/// render it again.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnswer {
    /// The answer text as returned by the engine.
    pub answer: String,
    /// Model that produced the answer.
    pub model: String,
    /// What the original query cost. Informational only; cache hits
    /// are free.
    pub cost_usd: f64,
    /// Input tokens consumed by the original query.
    pub input_tokens: u64,
    /// Output tokens produced by the original query.
    pub output_tokens: u64,
}

/// TTL cache of answers keyed by `(user, normalized question)`.
pub struct AnswerCache {
    entries: ExpiringMap<String, CachedAnswer>,
}

impl AnswerCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: ExpiringMap::new(ttl),
        }
    }

    /// Look up a live entry for this user and question.
    pub fn get(&self, user_id: i64, question: &str) -> Option<CachedAnswer> {
        self.get_at(user_id, question, Instant::now())
    }

    pub fn get_at(&self, user_id: i64, question: &str, now: Instant) -> Option<CachedAnswer> {
        self.entries.get_at(&cache_key(user_id, question), now)
    }

    /// Store an answer, refreshing the TTL if the key already exists.
    pub fn store(&self, user_id: i64, question: &str, answer: CachedAnswer) {
        self.store_at(user_id, question, answer, Instant::now());
    }

    pub fn store_at(&self, user_id: i64, question: &str, answer: CachedAnswer, now: Instant) {
        self.entries.insert_at(cache_key(user_id, question), answer, now);
    }

    /// Number of entries currently held, including any not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hash of `"{user_id}:{normalized question}"`. Normalization trims
/// surrounding whitespace and lowercases, so casing and padding
/// variants of a question share one entry.
fn cache_key(user_id: i64, question: &str) -> String {
    let normalized = question.trim().to_lowercase();
    sha256_hex(&format!("{user_id}:{normalized}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str) -> CachedAnswer {
        CachedAnswer {
            answer: text.to_string(),
            model: "haiku".to_string(),
            cost_usd: 0.01,
            input_tokens: 100,
            output_tokens: 50,
        }
    }

    #[test]
    fn miss_on_empty_cache() {
        let cache = AnswerCache::new(Duration::from_secs(300));
        assert!(cache.get(1, "what is rust?").is_none());
    }

    #[test]
    fn store_then_get() {
        let cache = AnswerCache::new(Duration::from_secs(300));
        cache.store(1, "what is rust?", answer("a language"));
        let hit = cache.get(1, "what is rust?").expect("cache hit");
        assert_eq!(hit.answer, "a language");
        assert_eq!(hit.model, "haiku");
    }

    #[test]
    fn normalization_merges_case_and_whitespace_variants() {
        let cache = AnswerCache::new(Duration::from_secs(300));
        cache.store(1, "  What Is Rust?  ", answer("a language"));
        assert!(cache.get(1, "what is rust?").is_some());
        assert!(cache.get(1, "WHAT IS RUST?").is_some());
    }

    #[test]
    fn interior_whitespace_is_significant() {
        let cache = AnswerCache::new(Duration::from_secs(300));
        cache.store(1, "what is rust?", answer("a language"));
        assert!(cache.get(1, "what  is rust?").is_none());
    }

    #[test]
    fn entries_are_scoped_per_user() {
        let cache = AnswerCache::new(Duration::from_secs(300));
        cache.store(1, "what is rust?", answer("a language"));
        assert!(cache.get(2, "what is rust?").is_none());
    }

    #[test]
    fn entry_expires_after_ttl() {
        let cache = AnswerCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.store_at(1, "q", answer("a"), t0);

        assert!(cache.get_at(1, "q", t0 + Duration::from_secs(300)).is_some());
        assert!(cache.get_at(1, "q", t0 + Duration::from_secs(301)).is_none());
    }

    #[test]
    fn restore_refreshes_ttl() {
        let cache = AnswerCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.store_at(1, "q", answer("a"), t0);
        cache.store_at(1, "q", answer("b"), t0 + Duration::from_secs(200));

        let hit = cache
            .get_at(1, "q", t0 + Duration::from_secs(400))
            .expect("refreshed entry still live");
        assert_eq!(hit.answer, "b");
    }
}
