// tests/support/mod.rs
// Shared stubs for the integration suites: a hand-advanced clock, scripted
// chat transports, and canned trend sources.
// Each suite uses its own subset.
#![allow(dead_code)]

use async_trait::async_trait;
use social_trend_analyzer::cache::Clock;
use social_trend_analyzer::enrich::{ChatRequest, ChatTransport, EnrichmentService};
use social_trend_analyzer::error::{EnrichError, SourceError};
use social_trend_analyzer::model::{Hashtag, SourceName, SourceTrends};
use social_trend_analyzer::retry::RetryPolicy;
use social_trend_analyzer::sources::TrendSource;
use social_trend_analyzer::themes::extract_themes;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Wall clock the tests move by hand.
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            now_ms: AtomicU64::new(start_ms),
        })
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Chat transport that replays a scripted sequence of outcomes and records
/// the model of every request it sees.
pub struct ScriptedTransport {
    script: Mutex<Vec<Result<String, EnrichError>>>,
    pub calls: AtomicUsize,
    pub models_seen: Mutex<Vec<String>>,
    pub temperatures_seen: Mutex<Vec<f32>>,
}

impl ScriptedTransport {
    /// Outcomes are consumed front to back; once exhausted, every further
    /// call succeeds with a fixed line.
    pub fn new(script: Vec<Result<String, EnrichError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            models_seen: Mutex::new(Vec::new()),
            temperatures_seen: Mutex::new(Vec::new()),
        })
    }

    pub fn always_ok(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn complete(&self, req: &ChatRequest) -> Result<String, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models_seen.lock().unwrap().push(req.model.clone());
        self.temperatures_seen.lock().unwrap().push(req.temperature);

        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Ok("scripted default completion".to_string());
        }
        if script.len() == 1 {
            // A final Ok repeats forever; a final Err is consumed once.
            if let Ok(text) = &script[0] {
                return Ok(text.clone());
            }
        }
        script.remove(0)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn service_with(transport: Arc<ScriptedTransport>, base_delay_ms: u64) -> EnrichmentService {
    EnrichmentService::new(
        transport,
        RetryPolicy {
            base_delay_ms,
            ..RetryPolicy::default()
        },
    )
}

/// Source returning a fixed set of hashtags and counting its fetches.
pub struct CannedSource {
    name: SourceName,
    hashtags: Vec<Hashtag>,
    pub fetches: AtomicUsize,
}

impl CannedSource {
    pub fn new(name: SourceName, hashtags: Vec<Hashtag>) -> Arc<Self> {
        Arc::new(Self {
            name,
            hashtags,
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrendSource for CannedSource {
    async fn fetch_trends(&self) -> Result<SourceTrends, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let themes = extract_themes(&self.hashtags, self.name);
        Ok(SourceTrends {
            hashtags: self.hashtags.clone(),
            themes,
        })
    }

    fn name(&self) -> SourceName {
        self.name
    }
}

/// Source that always fails with an upstream error.
pub struct FailingSource {
    name: SourceName,
}

impl FailingSource {
    pub fn new(name: SourceName) -> Arc<Self> {
        Arc::new(Self { name })
    }
}

#[async_trait]
impl TrendSource for FailingSource {
    async fn fetch_trends(&self) -> Result<SourceTrends, SourceError> {
        Err(SourceError::UpstreamStatus {
            status: 503,
            endpoint: format!("https://example.invalid/{}", self.name),
        })
    }

    fn name(&self) -> SourceName {
        self.name
    }
}

pub fn hashtag(tag: &str, engagement: u64, platform: SourceName) -> Hashtag {
    Hashtag::raw(tag, engagement, platform, "General")
}
