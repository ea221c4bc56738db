// src/orchestrator.rs
// Trend Orchestrator: cache check, fan-out across the requested adapters,
// tolerant fan-in, combination into one snapshot.

use crate::cache::{Clock, SnapshotCache};
use crate::error::TrendError;
use crate::model::{SourceName, TrendSnapshot};
use crate::settle::settle_all;
use crate::sources::TrendSource;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// News moves fast; everything else can stay cached longer.
pub const TTL_WITH_NEWS_MS: u64 = 2 * 60 * 1_000;
pub const TTL_DEFAULT_MS: u64 = 15 * 60 * 1_000;

pub fn ttl_for(sources: &[SourceName]) -> u64 {
    if sources.contains(&SourceName::News) {
        TTL_WITH_NEWS_MS
    } else {
        TTL_DEFAULT_MS
    }
}

pub struct TrendOrchestrator {
    registry: HashMap<SourceName, Arc<dyn TrendSource>>,
    cache: SnapshotCache,
    clock: Arc<dyn Clock>,
}

impl TrendOrchestrator {
    pub fn new(sources: Vec<Arc<dyn TrendSource>>, clock: Arc<dyn Clock>) -> Self {
        let registry = sources.into_iter().map(|s| (s.name(), s)).collect();
        Self {
            registry,
            cache: SnapshotCache::new(),
            clock,
        }
    }

    /// Fetch trends for a source set, serving from cache within the TTL.
    ///
    /// Failing adapters contribute nothing; only the case where every
    /// requested adapter failed becomes an error. Two concurrent requests
    /// for the same expired key may both refetch; the last write wins, which
    /// is an accepted staleness window rather than a correctness bug.
    pub async fn get_trends(&self, requested: &[SourceName]) -> Result<TrendSnapshot, TrendError> {
        let key = SnapshotCache::key(requested);
        let ttl_ms = ttl_for(requested);

        if let Some(hit) = self.cache.get_fresh(&key, ttl_ms, self.clock.now_ms()) {
            counter!("trend_cache_hits_total").increment(1);
            info!(%key, "serving cached trends");
            return Ok(hit);
        }
        counter!("trend_cache_misses_total").increment(1);

        let adapters: Vec<(SourceName, Arc<dyn TrendSource>)> = requested
            .iter()
            .filter_map(|name| self.registry.get(name).map(|s| (*name, s.clone())))
            .collect();

        let settled = settle_all(
            adapters
                .iter()
                .map(|(_, source)| {
                    let source = source.clone();
                    async move { source.fetch_trends().await }
                })
                .collect::<Vec<_>>(),
        )
        .await;

        let mut hashtags = Vec::new();
        let mut themes = Vec::new();
        let mut failures = 0usize;
        for ((name, _), outcome) in adapters.iter().zip(settled) {
            match outcome {
                Ok(trends) => {
                    hashtags.extend(trends.hashtags);
                    themes.extend(trends.themes);
                }
                Err(e) => {
                    warn!(source = %name, error = %e, "source failed, contributing empty result");
                    failures += 1;
                }
            }
        }

        if !adapters.is_empty() && failures == adapters.len() {
            return Err(TrendError::AllSourcesFailed {
                attempted: adapters.len(),
            });
        }

        // Cross-source entries stay distinct by design; per-source figures
        // remain reconstructible from each hashtag's platform field.
        let total_engagement = hashtags.iter().map(|h| h.engagement).sum();
        let snapshot = TrendSnapshot {
            hashtags,
            themes,
            total_engagement,
            platform_count: requested.len(),
            timestamp: self.clock.now_ms(),
        };

        self.cache
            .store(key, snapshot.clone(), self.clock.now_ms());
        Ok(snapshot)
    }
}
