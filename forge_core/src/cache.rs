//! Memo of assembled plans keyed by the effective request.
//!
//! Entries expire after a fixed TTL and are then recomputed; there is no
//! invalidation. Capacity is bounded with LRU eviction.

use crate::{GeneratedPlan, PlanRequest};
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Clone, Debug)]
struct CacheEntry {
    plan: GeneratedPlan,
    expires_at: DateTime<Utc>,
}

/// TTL-bounded plan memo, safe to share across threads
pub struct PlanCache {
    store: Mutex<LruCache<PlanRequest, CacheEntry>>,
    ttl: Duration,
}

impl PlanCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            store: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch a live entry; expired entries are dropped and miss
    pub fn get(&self, request: &PlanRequest, now: DateTime<Utc>) -> Option<GeneratedPlan> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());

        match store.get(request) {
            Some(entry) if entry.expires_at > now => {
                tracing::debug!("Plan cache hit for {:?}", request);
                Some(entry.plan.clone())
            }
            Some(_) => {
                store.pop(request);
                tracing::debug!("Plan cache entry expired for {:?}", request);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, request: PlanRequest, plan: GeneratedPlan, now: DateTime<Utc>) {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.put(
            request,
            CacheEntry {
                plan,
                expires_at: now
                    .checked_add_signed(self.ttl)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new(Duration::minutes(20), DEFAULT_CAPACITY.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Day, Goal, Level, Location};

    fn request(days: i64) -> PlanRequest {
        PlanRequest::new(Location::Gym, Goal::Bulking, Level::Beginner, days)
    }

    fn plan(label: &str) -> GeneratedPlan {
        GeneratedPlan {
            days: vec![Day {
                label: label.into(),
                exercises: vec![],
            }],
        }
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = PlanCache::new(Duration::minutes(20), 8);
        let now = Utc::now();
        cache.insert(request(3), plan("a"), now);

        let hit = cache.get(&request(3), now + Duration::minutes(19));
        assert_eq!(hit, Some(plan("a")));
    }

    #[test]
    fn test_expired_entry_misses_and_is_removed() {
        let cache = PlanCache::new(Duration::minutes(20), 8);
        let now = Utc::now();
        cache.insert(request(3), plan("a"), now);

        assert!(cache.get(&request(3), now + Duration::minutes(20)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_distinguish_requests() {
        let cache = PlanCache::new(Duration::minutes(20), 8);
        let now = Utc::now();
        cache.insert(request(3), plan("three"), now);

        assert!(cache.get(&request(4), now).is_none());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = PlanCache::new(Duration::minutes(20), 2);
        let now = Utc::now();
        cache.insert(request(1), plan("1"), now);
        cache.insert(request(2), plan("2"), now);
        cache.insert(request(3), plan("3"), now);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&request(1), now).is_none());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let cache = PlanCache::new(Duration::MAX, 4);
        let now = Utc::now();
        cache.insert(request(2), plan("forever"), now);

        assert_eq!(cache.get(&request(2), now + Duration::days(3650)), Some(plan("forever")));
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let cache = PlanCache::new(Duration::minutes(1), 0);
        cache.insert(request(1), plan("1"), Utc::now());
        assert_eq!(cache.len(), 1);
    }
}
