// src/enrich.rs
// AI Enrichment Service: explains why a hashtag is trending and drafts post
// text through an OpenAI-compatible chat endpoint (Groq). Rate limits are
// retried with exponential backoff; everything else fails immediately.

use crate::error::EnrichError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Fast default model for analysis and plain generation.
pub const MODEL_PRIMARY: &str = "llama3-8b-8192";
/// Larger model used for creative tones.
pub const MODEL_CREATIVE: &str = "llama3-70b-8192";

/// One chat completion request, provider-agnostic.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

impl ChatRequest {
    pub fn new(model: &str, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            system: system.into(),
            user: user.into(),
            temperature: 0.8,
            max_tokens: 250,
            top_p: None,
            frequency_penalty: None,
            presence_penalty: None,
        }
    }
}

/// Low-level transport: performs one real remote call. Separated from the
/// service so tests can count attempts and script failures.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, req: &ChatRequest) -> Result<String, EnrichError>;
    fn name(&self) -> &'static str;
}

/// Groq chat-completions transport. Requires an API key up front; the
/// constructor is the configuration precondition check.
#[derive(Debug)]
pub struct GroqTransport {
    http: reqwest::Client,
    api_key: String,
}

impl GroqTransport {
    pub fn new(api_key: String) -> Result<Self, EnrichError> {
        if api_key.trim().is_empty() {
            return Err(EnrichError::Configuration);
        }
        let http = reqwest::Client::builder()
            .user_agent("social-trend-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Ok(Self { http, api_key })
    }

    pub fn from_env() -> Result<Self, EnrichError> {
        let key = std::env::var("GROQ_API_KEY").map_err(|_| EnrichError::Configuration)?;
        Self::new(key)
    }
}

#[async_trait]
impl ChatTransport for GroqTransport {
    async fn complete(&self, req: &ChatRequest) -> Result<String, EnrichError> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
            #[serde(skip_serializing_if = "Option::is_none")]
            top_p: Option<f32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            frequency_penalty: Option<f32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            presence_penalty: Option<f32>,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let payload = Req {
            model: &req.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: &req.system,
                },
                Msg {
                    role: "user",
                    content: &req.user,
                },
            ],
            temperature: req.temperature,
            max_tokens: req.max_tokens,
            top_p: req.top_p,
            frequency_penalty: req.frequency_penalty,
            presence_penalty: req.presence_penalty,
        };

        let resp = self
            .http
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(EnrichError::RateLimited);
        }
        if !status.is_success() {
            return Err(EnrichError::Upstream {
                status: status.as_u16(),
            });
        }

        let body: Resp = resp.json().await?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(EnrichError::EmptyCompletion);
        }
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

/// High-level service: hashtag insight + post text generation on top of any
/// transport, with the shared retry policy applied to rate limits.
pub struct EnrichmentService {
    transport: Arc<dyn ChatTransport>,
    policy: RetryPolicy,
}

impl EnrichmentService {
    pub fn new(transport: Arc<dyn ChatTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn from_env() -> Result<Self, EnrichError> {
        let transport = GroqTransport::from_env()?;
        Ok(Self::new(Arc::new(transport), RetryPolicy::default()))
    }

    async fn complete_with_retry(&self, req: &ChatRequest) -> Result<String, EnrichError> {
        retry_with_backoff(&self.policy, EnrichError::is_retryable, |attempt| async move {
            debug!(
                provider = self.transport.name(),
                model = %req.model,
                attempt,
                "chat completion call"
            );
            self.transport.complete(req).await
        })
        .await
    }

    /// Explain why `tag` is trending on `platform_label` right now. The
    /// usage/description lines are deterministic templates; only the context
    /// comes from the model.
    pub async fn hashtag_insight(
        &self,
        tag: &str,
        platform_label: &str,
    ) -> Result<crate::model::HashtagInsight, EnrichError> {
        metrics::counter!("enrich_calls_total").increment(1);

        let today = chrono::Utc::now().format("%B %-d, %Y");
        let system = "You are a real-time social media trend analyst. Provide current, fresh \
                      analysis of why hashtags are trending RIGHT NOW. Focus on recent events, \
                      breaking news, viral content, and current social media phenomena. Be \
                      specific about timing and current context.";
        let user = format!(
            "Current date: {today}\n\n\
             You are a social media trend analyst. Analyze the hashtag \"#{tag}\" which is \
             currently trending on {platform_label}.\n\n\
             Please explain:\n\
             1. Why is \"#{tag}\" trending right now? What current events, topics, or phenomena \
             are driving its popularity?\n\
             2. What does this hashtag represent or relate to?\n\
             3. How should businesses effectively use this hashtag in their social media \
             content?\n\n\
             Important: Focus on why this hashtag is trending RIGHT NOW in the past 24-48 \
             hours. Provide current, fresh analysis based on recent events."
        );

        let req = ChatRequest::new(MODEL_PRIMARY, system, user);
        let context = self.complete_with_retry(&req).await?;

        Ok(crate::model::HashtagInsight {
            context,
            usage: format!(
                "Use #{tag} when your content relates to current trending topics. \
                 Perfect for engagement during peak discussion periods."
            ),
            description: format!("Currently trending on {platform_label}"),
        })
    }

    /// Text-generation sibling used by the message orchestrator. The caller
    /// owns prompt construction and output budgets.
    pub async fn generate_post(&self, req: &ChatRequest) -> Result<String, EnrichError> {
        metrics::counter!("generate_calls_total").increment(1);
        self.complete_with_retry(req).await
    }
}
