//! Social Trend Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use social_trend_analyzer::api::AppState;
use social_trend_analyzer::metrics::Metrics;
use social_trend_analyzer::orchestrator::{TTL_DEFAULT_MS, TTL_WITH_NEWS_MS};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("social_trend_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let state = AppState::from_env();
    let metrics = Metrics::init(TTL_DEFAULT_MS, TTL_WITH_NEWS_MS);
    let router = social_trend_analyzer::create_router(state).merge(metrics.router());

    let addr = std::env::var("TREND_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
