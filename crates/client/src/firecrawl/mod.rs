//! Firecrawl page extraction client.
//!
//! - **Endpoint**: `POST https://api.firecrawl.dev/v1/scrape`
//! - **Authentication**: `Authorization: Bearer <key>`.
//! - **Output**: main-content markdown plus the page title.
//!
//! The client is stateless; the pipeline layers its own cache on top.

use crate::error::ProviderError;
use crate::PageExtractor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default base URL for the Firecrawl API.
const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";

/// Upstream scrape timeout passed in the request body, in milliseconds.
const SCRAPE_TIMEOUT_MS: u64 = 60_000;

/// Selectors stripped from extracted pages (navigation, ads, boilerplate).
const EXCLUDE_TAGS: &[&str] = &[
    "nav",
    "footer",
    "aside",
    ".sidebar",
    ".comments",
    ".comment",
    ".share",
    ".social",
    ".related",
    ".recommended",
    ".newsletter",
    ".subscription",
    ".advertisement",
    ".ad",
    ".popup",
    ".modal",
    ".cookie",
    "#comments",
    "#sidebar",
    "#footer",
    "[class*='share']",
    "[class*='social']",
    "[class*='related']",
    "[class*='comment']",
    "[class*='newsletter']",
    "[class*='subscribe']",
];

/// Firecrawl API client configuration.
#[derive(Debug, Clone)]
pub struct FirecrawlConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(SCRAPE_TIMEOUT_MS),
        }
    }
}

/// A successfully extracted page.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    /// Main-content markdown.
    pub content: String,
    /// Page title; falls back to the URL when metadata has none.
    pub title: String,
}

/// JSON body for `POST /v1/scrape`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeBody<'a> {
    url: &'a str,
    formats: &'a [&'a str],
    only_main_content: bool,
    exclude_tags: &'a [&'a str],
    remove_base64_images: bool,
    block_ads: bool,
    timeout: u64,
}

/// Raw response from the Firecrawl scrape endpoint.
#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    metadata: Option<ScrapeMetadata>,
}

#[derive(Debug, Deserialize)]
struct ScrapeMetadata {
    #[serde(default)]
    title: Option<String>,
}

/// Firecrawl extraction client.
#[derive(Debug, Clone)]
pub struct FirecrawlClient {
    http: reqwest::Client,
    config: FirecrawlConfig,
}

impl FirecrawlClient {
    /// Create a new Firecrawl client with the given configuration.
    pub fn new(config: FirecrawlConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey { service: "firecrawl" });
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, config })
    }

    /// Scrape a URL into main-content markdown.
    ///
    /// A response without `success` and markdown content is a scrape failure
    /// carrying the HTTP status.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedPage, ProviderError> {
        let body = ScrapeBody {
            url,
            formats: &["markdown"],
            only_main_content: true,
            exclude_tags: EXCLUDE_TAGS,
            remove_base64_images: true,
            block_ads: true,
            timeout: SCRAPE_TIMEOUT_MS,
        };

        tracing::debug!(url, "scraping via Firecrawl");

        let http_response = self
            .http
            .post(format!("{}/v1/scrape", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = http_response.status().as_u16();

        // Firecrawl reports failure in the body, so parse regardless of status.
        let response: ScrapeResponse = match http_response.json().await {
            Ok(r) => r,
            Err(_) => return Err(ProviderError::Scrape { status }),
        };

        let markdown = response.data.as_ref().and_then(|d| d.markdown.clone());
        if !response.success {
            return Err(ProviderError::Scrape { status });
        }
        let Some(content) = markdown else {
            return Err(ProviderError::Scrape { status });
        };

        let title = response
            .data
            .and_then(|d| d.metadata)
            .and_then(|m| m.title)
            .unwrap_or_else(|| url.to_string());

        Ok(ScrapedPage { content, title })
    }
}

#[async_trait]
impl PageExtractor for FirecrawlClient {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, ProviderError> {
        FirecrawlClient::scrape(self, url).await
    }
}
