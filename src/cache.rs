// src/cache.rs
// TTL cache for trend snapshots, keyed by the sorted source set. The clock
// is injected so tests can drive expiry without sleeping. Absolute TTL, no
// sliding refresh; entries are replaced wholesale.

use crate::model::{SourceName, TrendSnapshot};
use std::collections::HashMap;
use std::sync::RwLock;

/// Millisecond wall clock. Production uses `SystemClock`; tests inject a
/// hand-advanced fake.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

struct CacheEntry {
    data: TrendSnapshot,
    stored_at_ms: u64,
}

/// Process-local snapshot cache. One writer per refresh, concurrent readers.
pub struct SnapshotCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Canonical cache key: sorted source names joined by commas.
    pub fn key(sources: &[SourceName]) -> String {
        let mut names: Vec<&str> = sources.iter().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names.join(",")
    }

    /// Return the cached snapshot if its age is still below `ttl_ms`.
    pub fn get_fresh(&self, key: &str, ttl_ms: u64, now_ms: u64) -> Option<TrendSnapshot> {
        let guard = self.entries.read().expect("cache lock poisoned");
        let entry = guard.get(key)?;
        let age = now_ms.saturating_sub(entry.stored_at_ms);
        (age < ttl_ms).then(|| entry.data.clone())
    }

    /// Store a snapshot, overwriting any prior entry for the key.
    pub fn store(&self, key: String, data: TrendSnapshot, now_ms: u64) {
        let mut guard = self.entries.write().expect("cache lock poisoned");
        guard.insert(
            key,
            CacheEntry {
                data,
                stored_at_ms: now_ms,
            },
        );
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}
