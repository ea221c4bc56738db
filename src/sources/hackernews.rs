// src/sources/hackernews.rs
// Hacker News adapter: top-story id list, then item details for the first
// few ids. Only curated tech vocabulary terms become hashtags.

use super::{enrich_and_theme, EnrichSettings, TrendSource};
use crate::enrich::EnrichmentService;
use crate::error::SourceError;
use crate::keywords::{extract_keywords, KeywordRule, TECH_TERMS};
use crate::model::{Hashtag, SourceName, SourceTrends};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const DEFAULT_BASE: &str = "https://hacker-news.firebaseio.com/v0";
const STORY_DETAIL_COUNT: usize = 5;

#[derive(Debug, Deserialize)]
struct Story {
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: u64,
}

pub struct HackerNewsSource {
    http: reqwest::Client,
    enricher: Arc<EnrichmentService>,
    settings: EnrichSettings,
    base_url: String,
}

impl HackerNewsSource {
    pub fn new(enricher: Arc<EnrichmentService>, settings: EnrichSettings) -> Self {
        Self {
            http: super::source_http_client(Duration::from_secs(10)),
            enricher,
            settings,
            base_url: DEFAULT_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn fetch_top_ids(&self) -> Result<Vec<u64>, SourceError> {
        let url = format!("{}/topstories.json", self.base_url);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::UpstreamStatus {
                status: resp.status().as_u16(),
                endpoint: url,
            });
        }
        resp.json::<Vec<u64>>().await.map_err(SourceError::from)
    }

    async fn fetch_story(&self, id: u64) -> Result<Story, SourceError> {
        let url = format!("{}/item/{id}.json", self.base_url);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::UpstreamStatus {
                status: resp.status().as_u16(),
                endpoint: url,
            });
        }
        resp.json::<Story>().await.map_err(SourceError::from)
    }
}

/// One tech-vocabulary keyword per story title, scored by story points.
fn extract_story_hashtags(stories: &[Story]) -> Vec<Hashtag> {
    let rule = KeywordRule::Vocabulary {
        terms: &TECH_TERMS,
        take: 1,
    };
    let mut out = Vec::new();
    for story in stories {
        for word in extract_keywords(&story.title, &rule) {
            out.push(Hashtag::raw(
                word,
                story.score,
                SourceName::Hackernews,
                "Technology",
            ));
        }
    }
    out
}

#[async_trait::async_trait]
impl TrendSource for HackerNewsSource {
    async fn fetch_trends(&self) -> Result<SourceTrends, SourceError> {
        super::ensure_metrics_described();
        counter!("source_fetch_total", "source" => "hackernews").increment(1);
        let t0 = std::time::Instant::now();

        let ids = self.fetch_top_ids().await?;
        let mut stories = Vec::with_capacity(STORY_DETAIL_COUNT);
        for id in ids.into_iter().take(STORY_DETAIL_COUNT) {
            match self.fetch_story(id).await {
                Ok(story) => stories.push(story),
                Err(e) => {
                    warn!(id, error = %e, "hacker news item fetch failed");
                    counter!("source_errors_total", "source" => "hackernews").increment(1);
                }
            }
        }
        counter!("source_items_total", "source" => "hackernews").increment(stories.len() as u64);

        let raw = extract_story_hashtags(&stories);
        histogram!("source_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        enrich_and_theme(SourceName::Hackernews, raw, &self.enricher, &self.settings).await
    }

    fn name(&self) -> SourceName {
        SourceName::Hackernews
    }
}
