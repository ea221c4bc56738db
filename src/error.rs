// src/error.rs
// Error taxonomy for the trend pipeline. Each boundary gets its own enum so
// callers can match on what actually went wrong instead of string-scraping.

use thiserror::Error;

/// Failures of the AI chat endpoint (enrichment and text generation).
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The provider credential is absent. Checked before any network call.
    #[error("AI provider credential is not configured (set GROQ_API_KEY)")]
    Configuration,

    /// HTTP 429 from the provider. The only retryable failure.
    #[error("AI provider rate limit hit")]
    RateLimited,

    /// Non-success, non-429 status from the provider.
    #[error("AI provider returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("AI provider request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// 2xx response that carried no usable completion text.
    #[error("AI provider returned an empty completion")]
    EmptyCompletion,
}

impl EnrichError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, EnrichError::RateLimited)
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, EnrichError::Configuration)
    }
}

/// Failures inside one source adapter. Recovered at the orchestrator
/// boundary: a failed adapter contributes an empty result.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status} from {endpoint}")]
    UpstreamStatus { status: u16, endpoint: String },

    #[error("could not parse upstream payload: {0}")]
    Parse(String),

    #[error(transparent)]
    Enrich(#[from] EnrichError),
}

/// Failures of a whole trend fetch, surfaced to the HTTP caller.
#[derive(Debug, Error)]
pub enum TrendError {
    /// Every requested adapter failed. No synthetic data is substituted.
    #[error("all {attempted} requested sources failed")]
    AllSourcesFailed { attempted: usize },
}

/// Failures of a message-generation request.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Ai(#[from] EnrichError),
}

impl GenerateError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, GenerateError::Ai(e) if e.is_configuration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limits_are_retryable() {
        assert!(EnrichError::RateLimited.is_retryable());
        assert!(!EnrichError::Configuration.is_retryable());
        assert!(!EnrichError::Upstream { status: 500 }.is_retryable());
        assert!(!EnrichError::EmptyCompletion.is_retryable());
    }

    #[test]
    fn configuration_is_detectable_through_generate_error() {
        let e = GenerateError::Ai(EnrichError::Configuration);
        assert!(e.is_configuration());
        let e = GenerateError::Ai(EnrichError::RateLimited);
        assert!(!e.is_configuration());
    }
}
