//! Gemini content analysis client.
//!
//! - **Endpoint**: `POST .../v1beta/models/<model>:generateContent?key=<key>`
//! - **Output**: a structured research analysis of an extracted article.

use crate::error::ProviderError;
use crate::Analyzer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default base URL for the Gemini API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for analysis.
const MODEL: &str = "gemini-3-flash-preview";

/// Sampling temperature for analysis output.
const TEMPERATURE: f32 = 0.3;

/// Gemini API client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self { api_key: String::new(), base_url: DEFAULT_BASE_URL.to_string(), timeout: Duration::from_secs(60) }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    contents: Vec<ContentBlock>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct ContentBlock {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Build the structured-analysis prompt for an article.
fn build_prompt(content: &str, title: &str, url: &str, context: Option<&str>) -> String {
    let context_block = match context {
        Some(context) => format!(
            "\nRESEARCH CONTEXT: The researcher is exploring: \"{context}\"\nFocus your analysis on what's most relevant to this question.\n"
        ),
        None => String::new(),
    };
    let context_insights = if context.is_some() { " Prioritize insights relevant to the research context." } else { "" };
    let context_connections = if context.is_some() { " How does it connect to the research question?" } else { "" };

    format!(
        r#"Analyze this article and extract the most valuable information for a researcher.
{context_block}
ARTICLE TITLE: {title}
URL: {url}

ARTICLE CONTENT:
{content}

---

Provide a structured analysis with:

1. **CORE ARGUMENT** (2-3 sentences): What is the main thesis or claim?

2. **KEY INSIGHTS** (bullet points): What are the most novel or important ideas? Focus on non-obvious insights.{context_insights}

3. **EVIDENCE & DATA** (bullet points): What concrete evidence, studies, or data supports the claims? Include specific numbers, citations, or examples.

4. **NOTABLE QUOTES** (2-3 max): Direct quotes that capture key ideas. Format: "quote" — context

5. **CREDIBILITY SIGNALS**: Author expertise, publication quality, cited sources, potential biases.

6. **CONNECTIONS**: How might this relate to other fields or ideas?{context_connections} What questions does it raise?

Be concise but substantive. Prioritize novel insights over obvious points. Include specific details, not vague summaries."#
    )
}

/// Gemini analysis client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey { service: "gemini" });
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, config })
    }

    /// Analyze article content, optionally steered by a research context.
    pub async fn analyze(
        &self, content: &str, title: &str, url: &str, context: Option<&str>,
    ) -> Result<String, ProviderError> {
        let body = GenerateBody {
            contents: vec![ContentBlock { parts: vec![TextPart { text: build_prompt(content, title, url, context) }] }],
            generation_config: GenerationConfig { temperature: TEMPERATURE },
        };

        tracing::debug!(url, with_context = context.is_some(), "analyzing via Gemini");

        let endpoint = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, MODEL, self.config.api_key
        );

        let http_response = self.http.post(&endpoint).json(&body).send().await?;

        let status = http_response.status();
        if !status.is_success() {
            let body = http_response.text().await.unwrap_or_default();
            return Err(ProviderError::Http { service: "gemini", status: status.as_u16(), body });
        }

        let response: GenerateResponse = http_response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

#[async_trait]
impl Analyzer for GeminiClient {
    async fn analyze(
        &self, content: &str, title: &str, url: &str, context: Option<&str>,
    ) -> Result<String, ProviderError> {
        GeminiClient::analyze(self, content, title, url, context).await
    }
}
