// src/sources/youtube.rs
// YouTube adapter: most-popular chart for a fixed region. The Data API
// needs a key; without one this source degrades to an empty result instead
// of failing the fetch.

use super::{enrich_and_theme, EnrichSettings, TrendSource};
use crate::enrich::EnrichmentService;
use crate::error::SourceError;
use crate::keywords::{extract_keywords, KeywordRule};
use crate::model::{Hashtag, SourceName, SourceTrends};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";
const REGION_CODE: &str = "IN";
const MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct VideoList {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    /// The Data API serializes counts as strings.
    #[serde(default, rename = "viewCount")]
    view_count: String,
}

impl Statistics {
    fn views(&self) -> u64 {
        self.view_count.parse().unwrap_or(0)
    }
}

pub struct YouTubeSource {
    http: reqwest::Client,
    enricher: Arc<EnrichmentService>,
    settings: EnrichSettings,
    api_key: Option<String>,
    endpoint: String,
}

impl YouTubeSource {
    pub fn new(
        enricher: Arc<EnrichmentService>,
        settings: EnrichSettings,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http: super::source_http_client(Duration::from_secs(10)),
            enricher,
            settings,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

/// Two generic keywords per video title; engagement is view count in
/// thousands so it ranks against upvote-scale numbers from other sources.
fn extract_video_hashtags(videos: &[Video]) -> Vec<Hashtag> {
    let rule = KeywordRule::Generic { take: 2 };
    let mut out = Vec::new();
    for video in videos {
        let engagement = video.statistics.views() / 1_000;
        for word in extract_keywords(&video.snippet.title, &rule) {
            out.push(Hashtag::raw(
                word,
                engagement,
                SourceName::Youtube,
                "Entertainment",
            ));
        }
    }
    out
}

#[async_trait::async_trait]
impl TrendSource for YouTubeSource {
    async fn fetch_trends(&self) -> Result<SourceTrends, SourceError> {
        super::ensure_metrics_described();

        let Some(api_key) = self.api_key.as_deref() else {
            debug!("youtube api key not configured, returning empty result");
            return Ok(SourceTrends::empty());
        };

        counter!("source_fetch_total", "source" => "youtube").increment(1);
        let t0 = std::time::Instant::now();

        let max_results = MAX_RESULTS.to_string();
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("part", "snippet,statistics"),
                ("chart", "mostPopular"),
                ("regionCode", REGION_CODE),
                ("maxResults", max_results.as_str()),
                ("key", api_key),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::UpstreamStatus {
                status: resp.status().as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let list: VideoList = resp.json().await?;
        counter!("source_items_total", "source" => "youtube").increment(list.items.len() as u64);

        let raw = extract_video_hashtags(&list.items);
        histogram!("source_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        enrich_and_theme(SourceName::Youtube, raw, &self.enricher, &self.settings).await
    }

    fn name(&self) -> SourceName {
        SourceName::Youtube
    }
}
