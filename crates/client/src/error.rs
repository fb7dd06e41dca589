//! Provider client error types.

use std::sync::Arc;

/// Errors from the three provider clients.
///
/// One attempt per request; there is no retry layer, so every variant is
/// terminal for the request that produced it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// Required API key is not configured for a service.
    #[error("{service} API key not set. Run 'scout setup' for instructions")]
    MissingApiKey { service: &'static str },

    /// Non-2xx HTTP response.
    #[error("{service} API error ({status}): {body}")]
    Http { service: &'static str, status: u16, body: String },

    /// Extraction provider reported failure or returned no content.
    #[error("Firecrawl scrape failed ({status})")]
    Scrape { status: u16 },

    /// Analysis provider returned no usable text.
    #[error("Gemini returned an empty response")]
    EmptyResponse,

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(Arc::new(err)) }
    }
}
