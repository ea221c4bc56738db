// src/api.rs
// HTTP surface: /trends, /generate-message, /health. Framework plumbing
// stays here; the handlers delegate straight to the orchestrators.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::error::TrendError;
use crate::generate::{BusinessProfile, MessageOrchestrator, SelectedTrends};
use crate::model::SourceName;
use crate::orchestrator::TrendOrchestrator;

const DEFAULT_SOURCES: [SourceName; 2] = [SourceName::Reddit, SourceName::Hackernews];

/// Both orchestrators are `None` when the AI credential is missing; the
/// handlers turn that into a configuration error instead of a crash.
#[derive(Clone)]
pub struct AppState {
    pub trends: Option<Arc<TrendOrchestrator>>,
    pub messages: Option<Arc<MessageOrchestrator>>,
}

impl AppState {
    /// Wire the production state from environment configuration. A missing
    /// AI credential leaves both orchestrators unset; the YouTube key only
    /// affects that one adapter.
    pub fn from_env() -> Self {
        use crate::cache::SystemClock;
        use crate::config::AppConfig;
        use crate::enrich::{EnrichmentService, GroqTransport};
        use crate::retry::RetryPolicy;
        use crate::sources::{
            hackernews::HackerNewsSource, news::NewsSource, reddit::RedditSource,
            youtube::YouTubeSource, EnrichSettings, TrendSource,
        };

        let config = AppConfig::from_env();
        let Some(key) = config.groq_api_key.clone() else {
            tracing::warn!("GROQ_API_KEY not set; trend and message endpoints will return a configuration error");
            return Self {
                trends: None,
                messages: None,
            };
        };

        let transport = GroqTransport::new(key).expect("non-empty key checked above");
        let enricher = Arc::new(EnrichmentService::new(
            Arc::new(transport),
            RetryPolicy::default(),
        ));

        let settings = EnrichSettings::default();
        let sources: Vec<Arc<dyn TrendSource>> = vec![
            Arc::new(RedditSource::new(enricher.clone(), settings.clone())),
            Arc::new(HackerNewsSource::new(enricher.clone(), settings.clone())),
            Arc::new(YouTubeSource::new(
                enricher.clone(),
                settings.clone(),
                config.youtube_api_key.clone(),
            )),
            Arc::new(NewsSource::new(enricher.clone(), settings)),
        ];

        Self {
            trends: Some(Arc::new(TrendOrchestrator::new(
                sources,
                Arc::new(SystemClock),
            ))),
            messages: Some(Arc::new(MessageOrchestrator::new(enricher))),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trends", get(trends_get).post(trends_post))
        .route("/generate-message", post(generate_message))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ---------- /health ----------

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "social-trend-analyzer",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// ---------- /trends ----------

#[derive(Deserialize)]
struct TrendsBody {
    #[serde(default)]
    platforms: Option<Vec<String>>,
}

fn parse_sources(names: &[String]) -> Result<Vec<SourceName>, String> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        out.push(name.parse::<SourceName>()?);
    }
    if out.is_empty() {
        out.extend(DEFAULT_SOURCES);
    }
    Ok(out)
}

async fn trends_get(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let names: Vec<String> = query
        .get("platforms")
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    fetch_trends(state, names).await
}

async fn trends_post(State(state): State<AppState>, Json(body): Json<TrendsBody>) -> Response {
    fetch_trends(state, body.platforms.unwrap_or_default()).await
}

async fn fetch_trends(state: AppState, names: Vec<String>) -> Response {
    let sources = match parse_sources(&names) {
        Ok(sources) => sources,
        Err(message) => {
            return error_envelope(StatusCode::BAD_REQUEST, "Invalid platforms", &message)
        }
    };

    let Some(orchestrator) = state.trends else {
        return error_envelope(
            StatusCode::UNPROCESSABLE_ENTITY,
            "AI service configuration error",
            "Trend enrichment requires GROQ_API_KEY to be configured",
        );
    };

    match orchestrator.get_trends(&sources).await {
        Ok(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "trends": snapshot,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e @ TrendError::AllSourcesFailed { .. }) => error_envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to analyze trends",
            &e.to_string(),
        ),
    }
}

// ---------- /generate-message ----------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    business_name: Option<String>,
    #[serde(default)]
    business_type: Option<String>,
    tone: Option<String>,
    selected_trends: Option<SelectedTrends>,
}

#[derive(Serialize)]
struct MissingFields {
    error: &'static str,
    required: [&'static str; 3],
}

async fn generate_message(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Response {
    let (Some(business_name), Some(tone), Some(selected_trends)) =
        (body.business_name, body.tone, body.selected_trends)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(MissingFields {
                error: "Missing required fields",
                required: ["businessName", "tone", "selectedTrends"],
            }),
        )
            .into_response();
    };

    let Some(generator) = state.messages else {
        return error_envelope(
            StatusCode::UNPROCESSABLE_ENTITY,
            "AI service configuration error",
            "AI text generation service is not properly configured",
        );
    };

    let business = BusinessProfile {
        name: business_name,
        business_type: body.business_type.unwrap_or_else(|| "other".to_string()),
        tone,
    };

    match generator.generate(&business, &selected_trends).await {
        Ok(messages) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "messages": messages,
                "generatedAt": chrono::Utc::now().to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) if e.is_configuration() => error_envelope(
            StatusCode::UNPROCESSABLE_ENTITY,
            "AI service configuration error",
            &e.to_string(),
        ),
        Err(e) => error_envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate messages",
            &e.to_string(),
        ),
    }
}

// ---------- envelopes ----------

fn error_envelope(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": error,
            "message": message,
        })),
    )
        .into_response()
}
