// tests/orchestrator_cache.rs
//
// Cache and fan-in behavior of the trend orchestrator, driven with a
// hand-advanced clock and counting stub sources. No sockets, no sleeps.

mod support;

use social_trend_analyzer::error::TrendError;
use social_trend_analyzer::model::SourceName;
use social_trend_analyzer::orchestrator::TrendOrchestrator;
use social_trend_analyzer::sources::TrendSource;
use std::sync::Arc;
use support::{hashtag, CannedSource, FailingSource, ManualClock};

const NEWS_TTL_MS: u64 = 2 * 60 * 1_000;
const DEFAULT_TTL_MS: u64 = 15 * 60 * 1_000;

fn canned(name: SourceName, tags: &[(&str, u64)]) -> Arc<CannedSource> {
    CannedSource::new(
        name,
        tags.iter()
            .map(|(t, e)| hashtag(t, *e, name))
            .collect(),
    )
}

#[tokio::test]
async fn news_requests_expire_after_two_minutes() {
    let clock = ManualClock::new(1_000_000);
    let news = canned(SourceName::News, &[("cricket", 200)]);
    let orchestrator =
        TrendOrchestrator::new(vec![news.clone() as Arc<dyn TrendSource>], clock.clone());

    let first = orchestrator.get_trends(&[SourceName::News]).await.unwrap();
    assert_eq!(first.hashtags.len(), 1);
    assert_eq!(news.fetch_count(), 1);

    // One tick before expiry: still served from cache.
    clock.advance(NEWS_TTL_MS - 1);
    orchestrator.get_trends(&[SourceName::News]).await.unwrap();
    assert_eq!(news.fetch_count(), 1);

    // Crossing the boundary triggers a refetch.
    clock.advance(1);
    orchestrator.get_trends(&[SourceName::News]).await.unwrap();
    assert_eq!(news.fetch_count(), 2);
}

#[tokio::test]
async fn non_news_requests_stay_cached_fifteen_minutes() {
    let clock = ManualClock::new(0);
    let reddit = canned(SourceName::Reddit, &[("rust", 100)]);
    let hn = canned(SourceName::Hackernews, &[("crypto", 80)]);
    let orchestrator = TrendOrchestrator::new(
        vec![
            reddit.clone() as Arc<dyn TrendSource>,
            hn.clone() as Arc<dyn TrendSource>,
        ],
        clock.clone(),
    );

    let request = [SourceName::Reddit, SourceName::Hackernews];
    orchestrator.get_trends(&request).await.unwrap();
    assert_eq!(reddit.fetch_count(), 1);

    // Well past the news TTL but inside the default one: cache holds.
    clock.advance(NEWS_TTL_MS * 3);
    orchestrator.get_trends(&request).await.unwrap();
    assert_eq!(reddit.fetch_count(), 1);
    assert_eq!(hn.fetch_count(), 1);

    clock.advance(DEFAULT_TTL_MS);
    orchestrator.get_trends(&request).await.unwrap();
    assert_eq!(reddit.fetch_count(), 2);
    assert_eq!(hn.fetch_count(), 2);
}

#[tokio::test]
async fn cache_key_ignores_request_order() {
    let clock = ManualClock::new(0);
    let reddit = canned(SourceName::Reddit, &[("rust", 100)]);
    let hn = canned(SourceName::Hackernews, &[("crypto", 80)]);
    let orchestrator = TrendOrchestrator::new(
        vec![
            reddit.clone() as Arc<dyn TrendSource>,
            hn.clone() as Arc<dyn TrendSource>,
        ],
        clock,
    );

    orchestrator
        .get_trends(&[SourceName::Reddit, SourceName::Hackernews])
        .await
        .unwrap();
    orchestrator
        .get_trends(&[SourceName::Hackernews, SourceName::Reddit])
        .await
        .unwrap();
    assert_eq!(reddit.fetch_count(), 1, "reordered set must hit the same entry");
}

#[tokio::test]
async fn one_failing_source_never_blocks_the_other() {
    let clock = ManualClock::new(0);
    let good = canned(
        SourceName::Reddit,
        &[("alpha", 10), ("beta", 20), ("gamma", 30)],
    );
    let bad = FailingSource::new(SourceName::Hackernews);
    let orchestrator = TrendOrchestrator::new(
        vec![
            good.clone() as Arc<dyn TrendSource>,
            bad as Arc<dyn TrendSource>,
        ],
        clock,
    );

    let snapshot = orchestrator
        .get_trends(&[SourceName::Reddit, SourceName::Hackernews])
        .await
        .expect("partial failure must not propagate");

    assert_eq!(snapshot.hashtags.len(), 3);
    assert_eq!(snapshot.total_engagement, 60);
    // Count reflects what was requested, not what succeeded.
    assert_eq!(snapshot.platform_count, 2);
}

#[tokio::test]
async fn all_sources_failing_is_an_error() {
    let clock = ManualClock::new(0);
    let orchestrator = TrendOrchestrator::new(
        vec![
            FailingSource::new(SourceName::Reddit) as Arc<dyn TrendSource>,
            FailingSource::new(SourceName::News) as Arc<dyn TrendSource>,
        ],
        clock,
    );

    let err = orchestrator
        .get_trends(&[SourceName::Reddit, SourceName::News])
        .await
        .unwrap_err();
    assert!(matches!(err, TrendError::AllSourcesFailed { attempted: 2 }));
}

#[tokio::test]
async fn snapshot_concatenates_across_sources_without_remerging() {
    let clock = ManualClock::new(0);
    // Same tag on two platforms stays two entries.
    let reddit = canned(SourceName::Reddit, &[("ai", 100)]);
    let hn = canned(SourceName::Hackernews, &[("ai", 50)]);
    let orchestrator = TrendOrchestrator::new(
        vec![
            reddit as Arc<dyn TrendSource>,
            hn as Arc<dyn TrendSource>,
        ],
        clock,
    );

    let snapshot = orchestrator
        .get_trends(&[SourceName::Reddit, SourceName::Hackernews])
        .await
        .unwrap();
    assert_eq!(snapshot.hashtags.len(), 2);
    assert_eq!(snapshot.total_engagement, 150);
}

#[tokio::test]
async fn cached_snapshot_is_returned_unchanged() {
    let clock = ManualClock::new(42_000);
    let news = canned(SourceName::News, &[("election", 120)]);
    let orchestrator = TrendOrchestrator::new(vec![news as Arc<dyn TrendSource>], clock.clone());

    let first = orchestrator.get_trends(&[SourceName::News]).await.unwrap();
    clock.advance(10);
    let second = orchestrator.get_trends(&[SourceName::News]).await.unwrap();
    assert_eq!(first.timestamp, second.timestamp);
    assert_eq!(first.total_engagement, second.total_engagement);
}
