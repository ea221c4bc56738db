// src/sources/news.rs
// News adapter: RSS headlines scraped with regex rather than a full XML
// parser. Real-world feeds ship malformed markup; the scraper keeps whatever
// items it can read and skips the rest. Engagement decays with article age.

use super::{enrich_and_theme, EnrichSettings, TrendSource};
use crate::enrich::EnrichmentService;
use crate::error::SourceError;
use crate::keywords::{extract_keywords, normalize_title, KeywordRule, NEWS_TERMS};
use crate::model::{Hashtag, SourceName, SourceTrends};
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};
use tracing::warn;

const DEFAULT_FEEDS: [&str; 4] = [
    "https://timesofindia.indiatimes.com/rssfeedstopstories.cms",
    "https://www.thehindu.com/news/national/feeder/default.rss",
    "https://www.hindustantimes.com/feeds/rss/news/rssfeed.xml",
    "https://feeds.feedburner.com/ndtvnews-top-stories",
];
/// Only the first feeds are polled per fetch, keeping the request budget low.
const FEEDS_PER_FETCH: usize = 2;
const ITEMS_PER_FEED: usize = 5;
const ARTICLES_KEPT_PER_FEED: usize = 3;

/// One headline pulled out of a feed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Article {
    pub title: String,
    /// Hours since publication; 1.0 when pubDate is missing or unreadable.
    pub age_hours: f64,
}

fn item_regex() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"(?is)<item[\s\S]*?</item>").unwrap())
}

fn tag_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}[^>]*>([\s\S]*?)</{tag}>")).unwrap()
}

fn title_regex() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| tag_regex("title"))
}

fn pub_date_regex() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| tag_regex("pubDate"))
}

fn parse_rfc2822_to_unix(ts: &str) -> Option<u64> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
        .and_then(|x| u64::try_from(x).ok())
}

/// Scrape `<item>` blocks out of raw feed XML. Items without a readable
/// title are skipped; everything else is tolerated.
pub(crate) fn scrape_feed(xml: &str, now_ms: u64) -> Vec<Article> {
    let mut out = Vec::new();
    for item in item_regex().find_iter(xml).take(ITEMS_PER_FEED) {
        let block = item.as_str();
        let Some(title_cap) = title_regex().captures(block) else {
            continue;
        };
        let title = normalize_title(&title_cap[1]);
        if title.is_empty() {
            continue;
        }

        let age_hours = pub_date_regex()
            .captures(block)
            .and_then(|c| parse_rfc2822_to_unix(&c[1]))
            .map(|pub_secs| {
                let pub_ms = pub_secs.saturating_mul(1_000);
                now_ms.saturating_sub(pub_ms) as f64 / 3_600_000.0
            })
            .unwrap_or(1.0);

        out.push(Article { title, age_hours });
    }
    out
}

/// Fresh articles rank higher: 200 engagement at one hour old, decaying
/// with age, floored at 50.
pub(crate) fn recency_engagement(age_hours: f64) -> u64 {
    let decayed = (200.0 / age_hours.max(1.0)).floor() as u64;
    decayed.max(50)
}

/// Up to two India-news vocabulary keywords per headline.
pub(crate) fn extract_article_hashtags(articles: &[Article]) -> Vec<Hashtag> {
    let rule = KeywordRule::Vocabulary {
        terms: &NEWS_TERMS,
        take: 2,
    };
    let mut out = Vec::new();
    for article in articles {
        let engagement = recency_engagement(article.age_hours);
        for word in extract_keywords(&article.title, &rule) {
            out.push(Hashtag::raw(word, engagement, SourceName::News, "News"));
        }
    }
    out
}

pub struct NewsSource {
    http: reqwest::Client,
    enricher: Arc<EnrichmentService>,
    settings: EnrichSettings,
    feeds: Vec<String>,
}

impl NewsSource {
    pub fn new(enricher: Arc<EnrichmentService>, settings: EnrichSettings) -> Self {
        Self {
            http: super::source_http_client(Duration::from_secs(8)),
            enricher,
            settings,
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_feeds(mut self, feeds: Vec<String>) -> Self {
        self.feeds = feeds;
        self
    }

    async fn fetch_feed(&self, url: &str) -> Result<String, SourceError> {
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::UpstreamStatus {
                status: resp.status().as_u16(),
                endpoint: url.to_string(),
            });
        }
        resp.text().await.map_err(SourceError::from)
    }
}

#[async_trait::async_trait]
impl TrendSource for NewsSource {
    async fn fetch_trends(&self) -> Result<SourceTrends, SourceError> {
        super::ensure_metrics_described();
        counter!("source_fetch_total", "source" => "news").increment(1);
        let t0 = std::time::Instant::now();
        let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;

        let mut articles = Vec::new();
        for url in self.feeds.iter().take(FEEDS_PER_FETCH) {
            match self.fetch_feed(url).await {
                Ok(xml) => {
                    let mut parsed = scrape_feed(&xml, now_ms);
                    parsed.truncate(ARTICLES_KEPT_PER_FEED);
                    counter!("source_items_total", "source" => "news")
                        .increment(parsed.len() as u64);
                    articles.extend(parsed);
                }
                Err(e) => {
                    warn!(feed = %url, error = %e, "news feed failed");
                    counter!("source_errors_total", "source" => "news").increment(1);
                }
            }
        }

        // Zero parseable items is an empty result, not a failure.
        let raw = extract_article_hashtags(&articles);
        histogram!("source_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        enrich_and_theme(SourceName::News, raw, &self.enricher, &self.settings).await
    }

    fn name(&self) -> SourceName {
        SourceName::News
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: u64 = 1_700_000_000_000;

    #[test]
    fn scrapes_title_and_age_from_items() {
        let xml = r#"<rss><channel>
            <item><title><![CDATA[Modi announces new startup policy]]></title>
                  <pubDate>Tue, 14 Nov 2023 21:13:20 +0000</pubDate></item>
            <item><title>Cricket final thriller in Mumbai</title></item>
        </channel></rss>"#;
        let articles = scrape_feed(xml, NOW_MS);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Modi announces new startup policy");
        // missing pubDate falls back to one hour
        assert!((articles[1].age_hours - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_items_are_skipped_not_fatal() {
        let xml = "<rss><item><title></title></item><item>no closing tag";
        let articles = scrape_feed(xml, NOW_MS);
        assert!(articles.is_empty());
    }

    #[test]
    fn unparseable_pub_date_defaults_to_one_hour() {
        let xml = "<item><title>Delhi budget session opens</title><pubDate>yesterday-ish</pubDate></item>";
        let articles = scrape_feed(xml, NOW_MS);
        assert!((articles[0].age_hours - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn engagement_decays_with_age_and_floors_at_fifty() {
        assert_eq!(recency_engagement(0.5), 200); // fresher than an hour: full score
        assert_eq!(recency_engagement(1.0), 200);
        assert_eq!(recency_engagement(2.0), 100);
        assert_eq!(recency_engagement(4.0), 50);
        assert_eq!(recency_engagement(100.0), 50);
    }

    #[test]
    fn only_news_vocabulary_terms_survive() {
        let articles = vec![Article {
            title: "cricket board mulls ipl expansion amid economy worries".into(),
            age_hours: 1.0,
        }];
        let tags = extract_article_hashtags(&articles);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].tag, "cricket");
        assert_eq!(tags[1].tag, "ipl");
        assert!(tags.iter().all(|h| h.engagement == 200));
    }

    #[test]
    fn zero_parseable_items_yield_zero_hashtags() {
        let tags = extract_article_hashtags(&[]);
        assert!(tags.is_empty());
    }
}
