//! HTTP clients for the scout pipeline's three providers.
//!
//! - [`exa`]: web search
//! - [`firecrawl`]: page extraction (stateless; caching is the caller's job)
//! - [`gemini`]: content analysis
//!
//! The pipeline is generic over the [`SearchProvider`], [`PageExtractor`],
//! and [`Analyzer`] traits so tests can substitute mocks.

pub mod error;
pub mod exa;
pub mod firecrawl;
pub mod gemini;

pub use error::ProviderError;
pub use exa::{ExaClient, SearchOptions};
pub use firecrawl::{FirecrawlClient, ScrapedPage};
pub use gemini::GeminiClient;

use async_trait::async_trait;
use scout_core::SearchResult;

/// Web search collaborator.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>, ProviderError>;
}

/// Page extraction collaborator.
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ProviderError>;
}

/// Content analysis collaborator.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self, content: &str, title: &str, url: &str, context: Option<&str>,
    ) -> Result<String, ProviderError>;
}
