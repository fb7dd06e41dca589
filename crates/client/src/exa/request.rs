//! Exa search request types.

use serde::Serialize;

/// Default number of results per search.
pub const DEFAULT_NUM_RESULTS: usize = 15;

/// Search options supplied by the caller (CLI flags + config defaults).
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Search type: auto, neural, or keyword.
    pub search_type: Option<String>,
    /// Result category (news, research paper, tweet, company, people, pdf).
    pub category: Option<String>,
    /// Number of results to request.
    pub num_results: Option<usize>,
    /// RFC3339 lower bound on publication date.
    pub start_published_date: Option<String>,
    /// RFC3339 upper bound on publication date.
    pub end_published_date: Option<String>,
    /// Domains to restrict results to.
    pub include_domains: Vec<String>,
    /// Domains to exclude from results.
    pub exclude_domains: Vec<String>,
    /// Live-crawl mode: never, fallback, preferred, always.
    pub livecrawl: Option<String>,
}

/// JSON body for `POST /search`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    pub query: String,
    pub num_results: usize,
    #[serde(rename = "type")]
    pub search_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_published_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livecrawl: Option<String>,
    pub contents: ContentsSpec,
}

/// Content enrichment requested alongside each result.
#[derive(Debug, Clone, Serialize)]
pub struct ContentsSpec {
    pub summary: SummarySpec,
    pub highlights: HighlightsSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarySpec {
    /// The summary is generated relative to the original query.
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightsSpec {
    pub num_sentences: usize,
    pub highlights_per_url: usize,
}

impl SearchBody {
    pub fn new(query: &str, options: &SearchOptions) -> Self {
        Self {
            query: query.to_string(),
            num_results: options.num_results.unwrap_or(DEFAULT_NUM_RESULTS),
            search_type: options.search_type.clone().unwrap_or_else(|| "auto".to_string()),
            category: options.category.clone(),
            start_published_date: options.start_published_date.clone(),
            end_published_date: options.end_published_date.clone(),
            include_domains: options.include_domains.clone(),
            exclude_domains: options.exclude_domains.clone(),
            livecrawl: options.livecrawl.clone(),
            contents: ContentsSpec {
                summary: SummarySpec { query: query.to_string() },
                highlights: HighlightsSpec { num_sentences: 2, highlights_per_url: 1 },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_defaults() {
        let body = SearchBody::new("rust async", &SearchOptions::default());
        assert_eq!(body.num_results, 15);
        assert_eq!(body.search_type, "auto");
        assert_eq!(body.contents.summary.query, "rust async");
    }

    #[test]
    fn test_body_field_names() {
        let options = SearchOptions {
            num_results: Some(5),
            start_published_date: Some("2024-01-01T00:00:00.000Z".into()),
            include_domains: vec!["example.com".into()],
            ..Default::default()
        };
        let body = SearchBody::new("q", &options);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["numResults"], 5);
        assert_eq!(json["type"], "auto");
        assert_eq!(json["startPublishedDate"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["includeDomains"][0], "example.com");
        assert_eq!(json["contents"]["highlights"]["numSentences"], 2);
        assert_eq!(json["contents"]["highlights"]["highlightsPerUrl"], 1);
    }

    #[test]
    fn test_body_omits_empty_optionals() {
        let body = SearchBody::new("q", &SearchOptions::default());
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("category").is_none());
        assert!(json.get("includeDomains").is_none());
        assert!(json.get("excludeDomains").is_none());
        assert!(json.get("livecrawl").is_none());
    }
}
