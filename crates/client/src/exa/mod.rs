//! Exa search API client.
//!
//! - **Endpoint**: `POST https://api.exa.ai/search`
//! - **Authentication**: `x-api-key` header.
//! - **Normalization**: responses are flattened into [`scout_core::SearchResult`],
//!   with summaries falling back to the first highlight.

pub mod request;
pub mod response;

pub use request::{SearchBody, SearchOptions};
pub use response::ExaSearchResponse;

use crate::error::ProviderError;
use crate::SearchProvider;
use async_trait::async_trait;
use scout_core::SearchResult;
use std::time::Duration;

/// Default base URL for the Exa API.
const DEFAULT_BASE_URL: &str = "https://api.exa.ai";

/// Exa API client configuration.
#[derive(Debug, Clone)]
pub struct ExaConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ExaConfig {
    fn default() -> Self {
        Self { api_key: String::new(), base_url: DEFAULT_BASE_URL.to_string(), timeout: Duration::from_secs(60) }
    }
}

/// Exa search API client.
#[derive(Debug, Clone)]
pub struct ExaClient {
    http: reqwest::Client,
    config: ExaConfig,
}

impl ExaClient {
    /// Create a new Exa client with the given configuration.
    pub fn new(config: ExaConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey { service: "exa" });
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, config })
    }

    /// Execute a search query, returning normalized results in rank order.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, ProviderError> {
        let body = SearchBody::new(query, options);
        let url = format!("{}/search", self.config.base_url);

        tracing::debug!(query, num_results = body.num_results, "searching Exa API");

        let http_response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("Exa API response status: {}", status);

        if !status.is_success() {
            let body = http_response.text().await.unwrap_or_default();
            return Err(ProviderError::Http { service: "exa", status: status.as_u16(), body });
        }

        let response: ExaSearchResponse = http_response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(response.into_results())
    }
}

#[async_trait]
impl SearchProvider for ExaClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, ProviderError> {
        ExaClient::search(self, query, options).await
    }
}
