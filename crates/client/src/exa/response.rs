//! Exa search response types and normalization.

use scout_core::SearchResult;
use serde::Deserialize;

/// Raw response from the Exa search API.
#[derive(Debug, Deserialize)]
pub struct ExaSearchResponse {
    #[serde(default)]
    pub results: Vec<ExaResult>,
}

/// Individual raw result from Exa.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExaResult {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl ExaSearchResponse {
    /// Normalize raw results, preserving order.
    ///
    /// Missing titles become `(no title)`; a missing summary falls back to
    /// the first highlight, and an empty one reads as absent.
    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title.unwrap_or_else(|| "(no title)".to_string()),
                url: r.url,
                author: r.author,
                published_date: r.published_date,
                summary: r
                    .summary
                    .or_else(|| r.highlights.into_iter().next())
                    .filter(|s| !s.is_empty()),
            })
            .collect()
    }
}
