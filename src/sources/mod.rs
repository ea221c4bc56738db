// src/sources/mod.rs
pub mod hackernews;
pub mod news;
pub mod reddit;
pub mod youtube;

use crate::consolidate::consolidate_hashtags;
use crate::enrich::EnrichmentService;
use crate::error::SourceError;
use crate::model::{Hashtag, SourceName, SourceTrends};
use crate::themes::extract_themes;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;
use std::time::Duration;
use tracing::warn;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("source_fetch_total", "Adapter fetch attempts per source.");
        describe_counter!("source_errors_total", "Adapter fetch/parse errors.");
        describe_counter!("source_items_total", "Raw items parsed from sources.");
        describe_counter!("enrich_calls_total", "AI hashtag analysis calls issued.");
        describe_counter!(
            "enrich_dropped_total",
            "Hashtags dropped after failed enrichment."
        );
        describe_counter!("generate_calls_total", "AI post generation calls issued.");
        describe_histogram!("source_fetch_ms", "Adapter fetch time in milliseconds.");
    });
}

/// One external content platform the orchestrator can fan out to.
#[async_trait::async_trait]
pub trait TrendSource: Send + Sync {
    /// Fetch raw items, extract keywords, enrich, and theme them.
    async fn fetch_trends(&self) -> Result<SourceTrends, SourceError>;
    fn name(&self) -> SourceName;
}

/// Knobs shared by every adapter's enrichment step.
#[derive(Debug, Clone)]
pub struct EnrichSettings {
    /// Consolidation cap before enrichment, bounding paid AI calls.
    pub max_enriched: usize,
    /// Fixed delay between consecutive AI calls for one adapter. Bounded
    /// concurrency of 1 keeps the provider's rate limiter quiet.
    pub call_gap: Duration,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            max_enriched: 3,
            call_gap: Duration::from_secs(2),
        }
    }
}

impl EnrichSettings {
    /// Zero-delay settings for tests.
    pub fn immediate(max_enriched: usize) -> Self {
        Self {
            max_enriched,
            call_gap: Duration::ZERO,
        }
    }
}

/// Shared request client for the public-content endpoints.
pub(crate) fn source_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("social-trend-analyzer/0.1 (trend aggregation bot)")
        .connect_timeout(Duration::from_secs(4))
        .timeout(timeout)
        .build()
        .expect("reqwest client")
}

/// The tail of every adapter: consolidate the raw tags down to the
/// enrichment budget, enrich them one at a time with a fixed gap, and derive
/// themes from what survived.
///
/// Posture: a configuration failure propagates (the whole adapter fails); any
/// other enrichment failure drops just that hashtag.
pub(crate) async fn enrich_and_theme(
    name: SourceName,
    raw: Vec<Hashtag>,
    enricher: &EnrichmentService,
    settings: &EnrichSettings,
) -> Result<SourceTrends, SourceError> {
    let retained = consolidate_hashtags(raw, settings.max_enriched);

    let mut enriched = Vec::with_capacity(retained.len());
    for (i, hashtag) in retained.into_iter().enumerate() {
        if i > 0 && !settings.call_gap.is_zero() {
            tokio::time::sleep(settings.call_gap).await;
        }
        match enricher
            .hashtag_insight(&hashtag.tag, name.display_label())
            .await
        {
            Ok(insight) => enriched.push(hashtag.with_insight(insight)),
            Err(e) if e.is_configuration() => return Err(e.into()),
            Err(e) => {
                warn!(source = %name, tag = %hashtag.tag, error = %e, "enrichment failed, dropping hashtag");
                counter!("enrich_dropped_total").increment(1);
            }
        }
    }

    let themes = extract_themes(&enriched, name);
    Ok(SourceTrends {
        hashtags: enriched,
        themes,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::enrich::{ChatRequest, ChatTransport};
    use crate::error::EnrichError;
    use crate::retry::RetryPolicy;
    use std::sync::Arc;

    /// Transport that answers every completion with a fixed line.
    pub struct FixedTransport;

    #[async_trait::async_trait]
    impl ChatTransport for FixedTransport {
        async fn complete(&self, _req: &ChatRequest) -> Result<String, EnrichError> {
            Ok("Trending due to recent events.".to_string())
        }
        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    pub fn fixed_enricher() -> EnrichmentService {
        EnrichmentService::new(Arc::new(FixedTransport), RetryPolicy::default())
    }
}
