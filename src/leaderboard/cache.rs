//! Keyed leaderboard result cache
//!
//! Last write wins. Entries carry their insertion instant and are served only
//! while younger than the freshness window. Stale entries are dropped when
//! read and swept on every insert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use super::models::{DataCompleteness, LeaderboardEntry, LeaderboardQueryKey};

#[derive(Debug, Clone)]
struct CachedResult {
    entries: Vec<LeaderboardEntry>,
    stored_at: Instant,
}

/// Shared, clonable cache handle
#[derive(Debug, Clone)]
pub struct LeaderboardCache {
    inner: Arc<Mutex<HashMap<LeaderboardQueryKey, CachedResult>>>,
    ttl: Duration,
}

impl LeaderboardCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn map(&self) -> MutexGuard<'_, HashMap<LeaderboardQueryKey, CachedResult>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached entries for `key` if still fresh
    pub fn get(&self, key: &LeaderboardQueryKey) -> Option<Vec<LeaderboardEntry>> {
        let mut map = self.map();
        let cached = map.get(key)?;
        if cached.stored_at.elapsed() < self.ttl {
            return Some(cached.entries.clone());
        }
        map.remove(key);
        None
    }

    /// Store `entries` for `key`, replacing whatever was there
    pub fn insert(&self, key: LeaderboardQueryKey, entries: Vec<LeaderboardEntry>) {
        let ttl = self.ttl;
        let mut map = self.map();
        map.retain(|_, cached| cached.stored_at.elapsed() < ttl);
        map.insert(
            key,
            CachedResult {
                entries,
                stored_at: Instant::now(),
            },
        );
    }

    /// Completeness of the cached result for `key`, fresh or not
    pub fn completeness(&self, key: &LeaderboardQueryKey) -> Option<DataCompleteness> {
        self.map()
            .get(key)
            .and_then(|c| c.entries.first())
            .map(|e| e.data_completeness)
    }

    /// Drop every cached result requested by `viewer_id`
    pub fn invalidate_viewer(&self, viewer_id: &str) -> usize {
        let mut map = self.map();
        let before = map.len();
        map.retain(|key, _| key.viewer_id != viewer_id);
        before - map.len()
    }

    /// Remove expired entries
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut map = self.map();
        let before = map.len();
        map.retain(|_, cached| cached.stored_at.elapsed() < ttl);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::models::{LeaderboardQuery, TimePeriod};

    fn key(viewer: &str) -> LeaderboardQueryKey {
        LeaderboardQuery::for_viewer(viewer)
            .with_period(TimePeriod::Week)
            .key()
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = LeaderboardCache::new(Duration::from_secs(300));
        cache.insert(key("u1"), vec![]);
        assert_eq!(cache.get(&key("u1")), Some(vec![]));

        tokio::time::advance(Duration::from_secs(301)).await;
        assert!(cache.get(&key("u1")).is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entries_are_evicted() {
        let cache = LeaderboardCache::new(Duration::from_secs(1));
        for i in 0..1000 {
            cache.insert(key(&format!("u{i}")), vec![]);
        }
        assert_eq!(cache.len(), 1000);

        tokio::time::advance(Duration::from_secs(10)).await;
        for i in 0..500 {
            assert!(cache.get(&key(&format!("u{i}"))).is_none());
        }
        assert_eq!(cache.len(), 500);

        // The next write sweeps the rest
        cache.insert(key("fresh"), vec![]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_keeps_fresh_entries() {
        let cache = LeaderboardCache::new(Duration::from_secs(60));
        cache.insert(key("old"), vec![]);
        tokio::time::advance(Duration::from_secs(45)).await;
        cache.insert(key("new"), vec![]);
        tokio::time::advance(Duration::from_secs(30)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.get(&key("new")).is_some());
    }

    #[tokio::test]
    async fn test_invalidate_viewer() {
        let cache = LeaderboardCache::new(Duration::from_secs(60));
        cache.insert(key("u1"), vec![]);
        cache.insert(
            LeaderboardQuery::for_viewer("u1").with_group("g").key().unwrap(),
            vec![],
        );
        cache.insert(key("u2"), vec![]);

        assert_eq!(cache.invalidate_viewer("u1"), 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("u2")).is_some());
    }
}
