// src/generate.rs
// Message Orchestrator: drafts one platform-tailored post per target network
// from a business profile and the caller's selected trend subset.
//
// Posture: fail-fast. The first platform whose AI call fails aborts the
// whole batch; no templated fallback text is substituted.

use crate::enrich::{ChatRequest, EnrichmentService, MODEL_CREATIVE, MODEL_PRIMARY};
use crate::error::GenerateError;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// The fixed target networks, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPlatform {
    Twitter,
    Instagram,
    LinkedIn,
    Facebook,
}

impl TargetPlatform {
    pub const ALL: [TargetPlatform; 4] = [
        TargetPlatform::Twitter,
        TargetPlatform::Instagram,
        TargetPlatform::LinkedIn,
        TargetPlatform::Facebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Twitter => "Twitter",
            TargetPlatform::Instagram => "Instagram",
            TargetPlatform::LinkedIn => "LinkedIn",
            TargetPlatform::Facebook => "Facebook",
        }
    }
}

/// Per-network content budget and flavor hints fed into the prompt.
pub struct PlatformSpec {
    pub platform: TargetPlatform,
    pub max_length: usize,
    pub hashtag_limit: usize,
    pub features: &'static str,
    pub description: &'static str,
}

pub fn platform_spec(platform: TargetPlatform) -> PlatformSpec {
    match platform {
        TargetPlatform::Twitter => PlatformSpec {
            platform,
            max_length: 280,
            hashtag_limit: 4,
            features: "hashtag-heavy, trending",
            description: "concise, trending hashtags, viral potential",
        },
        TargetPlatform::Instagram => PlatformSpec {
            platform,
            max_length: 2_200,
            hashtag_limit: 5,
            features: "storytelling, emotive",
            description: "visual-friendly, storytelling, lifestyle-focused",
        },
        TargetPlatform::LinkedIn => PlatformSpec {
            platform,
            max_length: 3_000,
            hashtag_limit: 3,
            features: "thought-leadership, business",
            description: "professional, thought-leadership, business-focused",
        },
        TargetPlatform::Facebook => PlatformSpec {
            platform,
            max_length: 1_000,
            hashtag_limit: 4,
            features: "discussion-starting, relatable",
            description: "community-focused, conversational, shareable",
        },
    }
}

/// Caller-supplied trend subset. Lenient on input: engagement and category
/// may be absent in what the UI posts back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectedTrends {
    #[serde(default)]
    pub hashtags: Vec<SelectedHashtag>,
    #[serde(default)]
    pub themes: Vec<SelectedTheme>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedHashtag {
    pub tag: String,
    #[serde(default)]
    pub engagement: u64,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedTheme {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct BusinessProfile {
    pub name: String,
    pub business_type: String,
    pub tone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMessage {
    pub platform: TargetPlatform,
    pub content: String,
    pub hashtags: Vec<String>,
    pub engagement_potential: u32,
    pub theme: String,
}

/// Fixed keyword-to-category lookup for the business type.
pub fn classify_business(business_type: &str) -> &'static str {
    let t = business_type.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| t.contains(w));
    if has(&["dating", "matrimony", "relationship"]) {
        "dating-matrimony"
    } else if has(&["tech", "software", "app"]) {
        "technology"
    } else if has(&["food", "restaurant", "cafe"]) {
        "food-beverage"
    } else if has(&["fashion", "clothing", "style"]) {
        "fashion-lifestyle"
    } else if has(&["health", "fitness", "wellness"]) {
        "health-wellness"
    } else if has(&["education", "learning", "course"]) {
        "education"
    } else if has(&["finance", "banking", "investment"]) {
        "finance"
    } else {
        "other"
    }
}

fn tone_description(tone: &str) -> &str {
    match tone {
        "professional" => "polished, authoritative, business-appropriate",
        "quirky" => "creative, unexpected, attention-grabbing",
        "humorous" => "funny, entertaining, meme-inspired",
        "inspirational" => "motivational, uplifting, empowering",
        "casual" => "relatable, conversational, friendly",
        other => other,
    }
}

fn is_creative_tone(tone: &str) -> bool {
    matches!(tone, "quirky" | "humorous" | "creative")
}

/// Model and sampling choices per tone: a larger model for playful tones,
/// tighter sampling for professional copy.
pub fn model_for_tone(tone: &str) -> &'static str {
    if is_creative_tone(tone) {
        MODEL_CREATIVE
    } else {
        MODEL_PRIMARY
    }
}

pub fn temperature_for_tone(tone: &str) -> f32 {
    if tone == "professional" {
        0.3
    } else {
        0.8
    }
}

/// Affinity score used to pick which trending hashtags a platform's post
/// should lean on.
fn score_hashtag(
    hashtag: &SelectedHashtag,
    platform: TargetPlatform,
    theme: &str,
    business_category: &str,
) -> f64 {
    let mut score = hashtag.engagement.max(1) as f64 / 1_000.0;

    let category = if hashtag.category.is_empty() {
        "General"
    } else {
        hashtag.category.as_str()
    };
    if platform == TargetPlatform::LinkedIn && category == "Business" {
        score += 20.0;
    }
    if platform == TargetPlatform::Instagram
        && matches!(
            category.to_lowercase().as_str(),
            "lifestyle" | "fashion" | "food"
        )
    {
        score += 15.0;
    }
    if platform == TargetPlatform::Twitter && hashtag.tag.len() <= 15 {
        score += 10.0;
    }
    if category.eq_ignore_ascii_case(theme) {
        score += 25.0;
    }
    if business_keywords(business_category)
        .iter()
        .any(|kw| hashtag.tag.to_lowercase().contains(kw))
    {
        score += 10.0;
    }
    score
}

fn business_keywords(category: &str) -> &'static [&'static str] {
    match category {
        "dating-matrimony" => &["dating", "love", "match"],
        "technology" => &["tech", "ai", "digital", "software"],
        "food-beverage" => &["food", "recipe", "restaurant"],
        "fashion-lifestyle" => &["fashion", "style", "trend"],
        "health-wellness" => &["health", "fitness", "wellness"],
        "education" => &["education", "learning", "skill"],
        "finance" => &["finance", "money", "invest"],
        _ => &[],
    }
}

fn select_hashtags(
    trends: &SelectedTrends,
    platform: TargetPlatform,
    theme: &str,
    business_category: &str,
    limit: usize,
) -> Vec<SelectedHashtag> {
    let mut scored: Vec<(f64, &SelectedHashtag)> = trends
        .hashtags
        .iter()
        .map(|h| (score_hashtag(h, platform, theme, business_category), h))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, h)| h.clone()).collect()
}

/// Strip wrapping quotes, collapse whitespace, and truncate to the platform
/// budget preferring a word boundary (with a trailing ellipsis when cut).
pub fn clean_post(raw: &str, max_length: usize) -> String {
    let mut cleaned = raw.trim().to_string();

    static RE_QUOTES: OnceCell<Regex> = OnceCell::new();
    let re_quotes = RE_QUOTES.get_or_init(|| Regex::new(r#"^["']|["']$"#).unwrap());
    cleaned = re_quotes.replace_all(&cleaned, "").to_string();

    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    cleaned = re_ws.replace_all(&cleaned, " ").trim().to_string();

    if cleaned.chars().count() > max_length {
        let truncated: String = cleaned.chars().take(max_length.saturating_sub(3)).collect();
        let cut = truncated.rfind(' ').unwrap_or(truncated.len());
        cleaned = format!("{}...", &truncated[..cut]);
    }
    cleaned
}

/// Deterministic engagement heuristic in [40, 98].
pub fn engagement_potential(
    message: &str,
    platform: TargetPlatform,
    trending_tags: &[String],
) -> u32 {
    let mut score: i32 = 70;

    static RE_HASHTAG: OnceCell<Regex> = OnceCell::new();
    let re_hashtag = RE_HASHTAG.get_or_init(|| Regex::new(r"#\w+").unwrap());
    let hashtag_count = re_hashtag.find_iter(message).count() as i32;
    score += (hashtag_count * 5).min(15);

    if message.contains('?') {
        score += 5;
    }
    if message.contains('!') {
        score += 5;
    }
    if ['💰', '🚀', '🎉', '✨', '🔥', '💡']
        .iter()
        .any(|e| message.contains(*e))
    {
        score += 8;
    }

    let lower = message.to_lowercase();
    let mentioned = trending_tags
        .iter()
        .filter(|t| lower.contains(&t.to_lowercase()))
        .count() as i32;
    score += mentioned * 3;

    let len = message.chars().count();
    score += match platform {
        TargetPlatform::Twitter => {
            if len <= 240 {
                5
            } else {
                -5
            }
        }
        TargetPlatform::Instagram => {
            if len > 100 {
                5
            } else {
                0
            }
        }
        TargetPlatform::LinkedIn => {
            if len > 200 {
                5
            } else {
                0
            }
        }
        TargetPlatform::Facebook => {
            if message.contains('?') {
                8
            } else {
                0
            }
        }
    };

    score.clamp(40, 98) as u32
}

fn build_prompt(
    business: &BusinessProfile,
    business_category: &str,
    tone: &str,
    spec: &PlatformSpec,
    theme: &str,
    hashtags: &[SelectedHashtag],
) -> String {
    let hashtag_list = hashtags
        .iter()
        .map(|h| h.tag.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Create a {tone} social media post for {platform} about {name}, a {category} business.\n\n\
         Context:\n\
         - Business: {name} ({category})\n\
         - Theme: {theme}\n\
         - Tone: {tone_desc}\n\
         - Platform: {platform} ({platform_desc})\n\
         - Trending topics: {hashtag_list}\n\n\
         Requirements:\n\
         - {features}\n\
         - Include relevant hashtags from: {hashtag_list}\n\
         - Match the {tone} tone exactly\n\
         - Connect {name} to the {theme} theme naturally\n\
         - Maximum length: {max_length} characters\n\n\
         Generate only the social media post content:",
        platform = spec.platform.as_str(),
        name = business.name,
        category = business_category,
        theme = theme,
        tone_desc = tone_description(tone),
        platform_desc = spec.description,
        features = spec.features,
        max_length = spec.max_length,
    )
}

pub struct MessageOrchestrator {
    ai: Arc<EnrichmentService>,
}

impl MessageOrchestrator {
    pub fn new(ai: Arc<EnrichmentService>) -> Self {
        Self { ai }
    }

    /// One draft per fixed target platform, in order.
    pub async fn generate(
        &self,
        business: &BusinessProfile,
        trends: &SelectedTrends,
    ) -> Result<Vec<GeneratedMessage>, GenerateError> {
        let tone = business.tone.as_str();
        let business_category = classify_business(&business.business_type);
        let theme = trends
            .themes
            .first()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| "general".to_string());

        info!(
            business = %business.name,
            category = business_category,
            tone,
            "generating platform drafts"
        );

        let mut messages = Vec::with_capacity(TargetPlatform::ALL.len());
        for platform in TargetPlatform::ALL {
            let spec = platform_spec(platform);
            let selected = select_hashtags(
                trends,
                platform,
                &theme,
                business_category,
                spec.hashtag_limit,
            );

            let prompt = build_prompt(business, business_category, tone, &spec, &theme, &selected);
            let system = format!(
                "You are an expert social media content creator specializing in {tone} content. \
                 Generate engaging, original social media posts that are platform-specific and \
                 include trending hashtags naturally. Be creative and authentic."
            );

            let mut req = ChatRequest::new(model_for_tone(tone), system, prompt);
            req.temperature = temperature_for_tone(tone);
            req.max_tokens = (spec.max_length * 2).min(400) as u32;
            req.top_p = Some(0.9);
            req.frequency_penalty = Some(0.2);
            req.presence_penalty = Some(0.1);

            let raw = self.ai.generate_post(&req).await?;
            let content = clean_post(&raw, spec.max_length);
            let trending: Vec<String> = selected.iter().map(|h| h.tag.clone()).collect();
            let potential = engagement_potential(&content, platform, &trending);

            messages.push(GeneratedMessage {
                platform,
                content,
                hashtags: trending,
                engagement_potential: potential,
                theme: theme.clone(),
            });
        }

        Ok(messages)
    }
}
