// src/model.rs
// Shared data model for the trend pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A content source the orchestrator can be asked to fetch from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceName {
    Reddit,
    Hackernews,
    Youtube,
    News,
}

impl SourceName {
    pub const ALL: [SourceName; 4] = [
        SourceName::Reddit,
        SourceName::Hackernews,
        SourceName::Youtube,
        SourceName::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Reddit => "reddit",
            SourceName::Hackernews => "hackernews",
            SourceName::Youtube => "youtube",
            SourceName::News => "news",
        }
    }

    /// Human-readable label used in AI prompts ("trending on ...").
    pub fn display_label(&self) -> &'static str {
        match self {
            SourceName::Reddit => "Reddit",
            SourceName::Hackernews => "Hacker News",
            SourceName::Youtube => "YouTube",
            SourceName::News => "Indian News",
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reddit" => Ok(SourceName::Reddit),
            "hackernews" => Ok(SourceName::Hackernews),
            "youtube" => Ok(SourceName::Youtube),
            "news" => Ok(SourceName::News),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// LLM-generated explanation attached to a hashtag by the enrichment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagInsight {
    pub context: String,
    pub usage: String,
    pub description: String,
}

/// A topical tag with an aggregated engagement score and source category.
///
/// `context`/`usage`/`description` stay absent when enrichment was skipped
/// or failed for this tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hashtag {
    pub tag: String,
    pub engagement: u64,
    pub platform: SourceName,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Hashtag {
    /// A bare, un-enriched hashtag as the adapters first produce it.
    pub fn raw(
        tag: impl Into<String>,
        engagement: u64,
        platform: SourceName,
        category: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            engagement,
            platform,
            category: category.into(),
            context: None,
            usage: None,
            description: None,
        }
    }

    pub fn with_insight(mut self, insight: HashtagInsight) -> Self {
        self.context = Some(insight.context);
        self.usage = Some(insight.usage);
        self.description = Some(insight.description);
        self
    }
}

/// A normalized category grouping of hashtags with a bounded weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub weight: f64,
    pub platforms: Vec<SourceName>,
}

/// What one adapter returns from a single fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceTrends {
    pub hashtags: Vec<Hashtag>,
    pub themes: Vec<Theme>,
}

impl SourceTrends {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The combined result for one source set, as stored in the cache and
/// returned to the caller. Superseded wholesale on refresh, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSnapshot {
    pub hashtags: Vec<Hashtag>,
    pub themes: Vec<Theme>,
    pub total_engagement: u64,
    pub platform_count: usize,
    /// Unix milliseconds at snapshot creation.
    pub timestamp: u64,
}
