// src/sources/reddit.rs
// Reddit adapter: hot listings from a couple of subreddits. Public JSON
// endpoints get blocked from cloud IPs now and then, so each listing is
// tried against mirror hosts in order and the first success wins.

use super::{enrich_and_theme, EnrichSettings, TrendSource};
use crate::enrich::EnrichmentService;
use crate::error::SourceError;
use crate::keywords::{extract_keywords, KeywordRule};
use crate::model::{Hashtag, SourceName, SourceTrends};
use metrics::{counter, histogram};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

const SUBREDDITS: [&str; 2] = ["all", "popular"];
const MIRROR_BASES: [&str; 3] = [
    "https://www.reddit.com",
    "https://old.reddit.com",
    "https://api.reddit.com",
];
const LISTING_LIMIT: u32 = 10;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<PostWrapper>,
}

#[derive(Debug, Deserialize)]
struct PostWrapper {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: i64,
}

pub struct RedditSource {
    http: reqwest::Client,
    enricher: Arc<EnrichmentService>,
    settings: EnrichSettings,
    mirrors: Vec<String>,
}

impl RedditSource {
    pub fn new(enricher: Arc<EnrichmentService>, settings: EnrichSettings) -> Self {
        Self {
            http: super::source_http_client(std::time::Duration::from_secs(10)),
            enricher,
            settings,
            mirrors: MIRROR_BASES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Override mirror bases (tests point these at a local server).
    pub fn with_mirrors(mut self, mirrors: Vec<String>) -> Self {
        self.mirrors = mirrors;
        self
    }

    /// Fetch one subreddit's hot listing, falling through the mirror list.
    async fn fetch_listing(&self, subreddit: &str) -> Result<Listing, SourceError> {
        let mut last_err: Option<SourceError> = None;
        for base in &self.mirrors {
            let url = format!("{base}/r/{subreddit}/hot.json?limit={LISTING_LIMIT}");
            match self.http.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp.json::<Listing>().await.map_err(SourceError::from);
                }
                Ok(resp) => {
                    last_err = Some(SourceError::UpstreamStatus {
                        status: resp.status().as_u16(),
                        endpoint: url,
                    });
                }
                Err(e) => last_err = Some(e.into()),
            }
        }
        Err(last_err.unwrap_or_else(|| SourceError::Parse("no reddit mirrors configured".into())))
    }
}

/// Turn one listing's posts into raw hashtags: two generic keywords per
/// title, each carrying the post score as engagement.
fn extract_post_hashtags(posts: &[Post]) -> Vec<Hashtag> {
    let rule = KeywordRule::Generic { take: 2 };
    let mut out = Vec::new();
    for post in posts {
        let score = post.score.max(0) as u64;
        for word in extract_keywords(&post.title, &rule) {
            out.push(Hashtag::raw(word, score, SourceName::Reddit, "General"));
        }
    }
    out
}

#[async_trait::async_trait]
impl TrendSource for RedditSource {
    async fn fetch_trends(&self) -> Result<SourceTrends, SourceError> {
        super::ensure_metrics_described();
        counter!("source_fetch_total", "source" => "reddit").increment(1);
        let t0 = std::time::Instant::now();

        let mut raw = Vec::new();
        for subreddit in SUBREDDITS {
            match self.fetch_listing(subreddit).await {
                Ok(listing) => {
                    let posts: Vec<Post> =
                        listing.data.children.into_iter().map(|w| w.data).collect();
                    counter!("source_items_total", "source" => "reddit")
                        .increment(posts.len() as u64);
                    raw.extend(extract_post_hashtags(&posts));
                }
                Err(e) => {
                    // One blocked subreddit must not sink the other.
                    warn!(subreddit, error = %e, "reddit listing failed");
                    counter!("source_errors_total", "source" => "reddit").increment(1);
                }
            }
        }

        histogram!("source_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        enrich_and_theme(SourceName::Reddit, raw, &self.enricher, &self.settings).await
    }

    fn name(&self) -> SourceName {
        SourceName::Reddit
    }
}
