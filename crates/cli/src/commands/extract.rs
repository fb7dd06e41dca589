//! Extract command: resolve a session selector (or direct URL) and fan out
//! extraction/analysis per target.
//!
//! Each target runs concurrently; per-target failures are reported as status
//! lines and never abort sibling targets. Successful articles are aggregated
//! in the originally requested order.

use crate::cli::ExtractArgs;
use crate::output::{print_articles, status, truncate_chars};
use scout_client::firecrawl::{FirecrawlClient, FirecrawlConfig};
use scout_client::gemini::{GeminiClient, GeminiConfig};
use scout_client::{Analyzer, PageExtractor};
use scout_core::{select, AppConfig, DirStore, Error, ExtractCache, SessionStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;

/// An extracted (and possibly analyzed) article.
///
/// `index` is the 1-based position within the originating selection, not a
/// global identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedArticle {
    pub index: usize,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub content: String,
}

/// A resolved extraction target.
#[derive(Debug, Clone)]
pub struct Target {
    pub index: usize,
    pub title: String,
    pub url: String,
    pub author: Option<String>,
}

/// Per-batch mode flags.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub raw: bool,
    pub no_cache: bool,
    pub limit: usize,
    pub context: Option<String>,
}

pub async fn run(config: &AppConfig, args: ExtractArgs) -> Result<(), Error> {
    let context = load_context(&args)?;
    let options =
        BatchOptions { raw: args.raw, no_cache: args.no_cache, limit: args.limit, context };

    // Stage preconditions: fail before any network call.
    let extractor = make_extractor(config)?;
    let analyzer = if options.raw { None } else { Some(make_analyzer(config)?) };

    let cache = Arc::new(ExtractCache::new(
        Arc::new(DirStore::new(&config.cache_dir)),
        config.cache_ttl_ms(),
        config.cache_max_entries,
    ));

    if is_direct_url(&args.target) {
        from_url(cache, extractor, analyzer, &args.target, &options, args.json).await
    } else {
        from_session(config, cache, extractor, analyzer, &args.target, &options, args.json).await
    }
}

fn is_direct_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Resolve the research context from `--context` or `--context-file`.
fn load_context(args: &ExtractArgs) -> Result<Option<String>, Error> {
    if let Some(context) = &args.context {
        return Ok(Some(context.clone()));
    }

    if let Some(path) = &args.context_file {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidInput(format!("failed to read context file: {e}")))?;
        return Ok(Some(text.trim().to_string()));
    }

    Ok(None)
}

fn make_extractor(config: &AppConfig) -> Result<Arc<dyn PageExtractor>, Error> {
    let api_key = config.require_firecrawl_api_key()?;
    let client =
        FirecrawlClient::new(FirecrawlConfig { api_key: api_key.to_string(), ..Default::default() })
            .map_err(|e| Error::Provider(e.to_string()))?;
    Ok(Arc::new(client))
}

fn make_analyzer(config: &AppConfig) -> Result<Arc<dyn Analyzer>, Error> {
    let api_key = config.require_gemini_api_key()?;
    let client = GeminiClient::new(GeminiConfig {
        api_key: api_key.to_string(),
        timeout: config.timeout(),
        ..Default::default()
    })
    .map_err(|e| Error::Provider(e.to_string()))?;
    Ok(Arc::new(client))
}

/// Extract from a stored session via a selector like `a1b:1,3` or `:all`.
#[allow(clippy::too_many_arguments)]
async fn from_session(
    config: &AppConfig, cache: Arc<ExtractCache>, extractor: Arc<dyn PageExtractor>,
    analyzer: Option<Arc<dyn Analyzer>>, target: &str, options: &BatchOptions, json: bool,
) -> Result<(), Error> {
    let selector = select::parse_selector(target);

    let store = Arc::new(DirStore::new(&config.session_dir));
    let sessions = SessionStore::new(store, config.session_expiry_ms(), config.max_sessions);
    let session = sessions
        .load(selector.session_id.as_deref())?
        .ok_or_else(|| Error::SessionNotFound(selector.session_id.clone()))?;

    let indices = select::parse_indices(&selector.action)?;

    let mode = if options.raw { "raw" } else { "analyze" };
    let with_context = if options.context.is_some() { " with context" } else { "" };
    status(&format!("\n📄 Extracting {} article(s) [{mode}]{with_context}...\n", indices.len()));

    let mut targets = Vec::new();
    for (index, result) in select::resolve(&session, &indices) {
        match result {
            Some(result) => targets.push(Target {
                index,
                title: result.title.clone(),
                url: result.url.clone(),
                author: result.author.clone(),
            }),
            None => status(&format!("   [{index}] No result at index {index}")),
        }
    }

    let articles = run_batch(cache, extractor, analyzer, targets, options.clone()).await;

    if articles.is_empty() {
        status("No articles extracted.");
        return Ok(());
    }

    print_articles(&articles, json);
    Ok(())
}

/// Extract a single direct URL; failure here is fatal for the invocation.
async fn from_url(
    cache: Arc<ExtractCache>, extractor: Arc<dyn PageExtractor>, analyzer: Option<Arc<dyn Analyzer>>,
    url: &str, options: &BatchOptions, json: bool,
) -> Result<(), Error> {
    let mode = if options.raw { "raw" } else { "analyze" };
    let with_context = if options.context.is_some() { " with context" } else { "" };
    status(&format!("\n📄 Extracting [{mode}]{with_context}: {url}"));

    let (content, title, cached) = fetch_content(&cache, &extractor, url, options.no_cache)
        .await
        .map_err(|e| Error::Provider(format!("extraction failed: {e}")))?;

    if cached {
        status("⚡ Using cached extraction");
    }

    let body = if options.raw {
        truncate_raw(content, options.limit)
    } else {
        let analyzer = analyzer.expect("analyzer present in analyze mode");
        let text = analyzer
            .analyze(&content, &title, url, options.context.as_deref())
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;
        status(&format!("✓ Analyzed{}", if cached { " (from cache)" } else { "" }));
        text
    };

    let article = ExtractedArticle { index: 1, title, url: url.to_string(), author: None, content: body };
    print_articles(&[article], json);
    Ok(())
}

/// Fan out one extraction (and optional analysis) per target.
///
/// Waits for all targets to settle and aggregates successes in requested
/// order; failed and missing targets are dropped, not replaced.
pub async fn run_batch(
    cache: Arc<ExtractCache>, extractor: Arc<dyn PageExtractor>, analyzer: Option<Arc<dyn Analyzer>>,
    targets: Vec<Target>, options: BatchOptions,
) -> Vec<ExtractedArticle> {
    let mut join_set = JoinSet::new();

    for (position, target) in targets.into_iter().enumerate() {
        let cache = cache.clone();
        let extractor = extractor.clone();
        let analyzer = analyzer.clone();
        let options = options.clone();

        join_set.spawn(async move {
            let article = process_target(&cache, &extractor, analyzer.as_deref(), target, &options).await;
            (position, article)
        });
    }

    let mut outcomes: Vec<(usize, Option<ExtractedArticle>)> = Vec::new();
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::warn!("extraction task panicked: {e}"),
        }
    }

    outcomes.sort_by_key(|(position, _)| *position);
    outcomes.into_iter().filter_map(|(_, article)| article).collect()
}

/// Process one target: cache-first extraction, then raw truncation or analysis.
///
/// Returns `None` on failure; the failure has already been reported as a
/// status line.
async fn process_target(
    cache: &ExtractCache, extractor: &Arc<dyn PageExtractor>, analyzer: Option<&dyn Analyzer>,
    target: Target, options: &BatchOptions,
) -> Option<ExtractedArticle> {
    status(&format!("   [{}] {}...", target.index, truncate_chars(&target.title, 50)));

    let fetched = fetch_content(cache, extractor, &target.url, options.no_cache).await;
    let (content, _, cached) = match fetched {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::debug!(url = target.url, "extraction failed: {e}");
            status(&format!("   [{}] ✗ Failed to extract", target.index));
            return None;
        }
    };

    if cached {
        status(&format!("   [{}] ⚡ Cached", target.index));
    }

    let body = if options.raw {
        truncate_raw(content, options.limit)
    } else {
        let analyzer = analyzer.expect("analyzer present in analyze mode");
        match analyzer.analyze(&content, &target.title, &target.url, options.context.as_deref()).await {
            Ok(text) => {
                status(&format!(
                    "   [{}] ✓ Analyzed{}",
                    target.index,
                    if cached { " (from cache)" } else { "" }
                ));
                text
            }
            Err(e) => {
                tracing::debug!(url = target.url, "analysis failed: {e}");
                status(&format!("   [{}] ✗ Analysis failed", target.index));
                return None;
            }
        }
    };

    Some(ExtractedArticle {
        index: target.index,
        title: target.title,
        url: target.url,
        author: target.author,
        content: body,
    })
}

/// Cache-first content fetch. Returns (content, title, was_cached).
///
/// Fresh extractions are written back to the cache even when the lookup was
/// bypassed with `no_cache`.
async fn fetch_content(
    cache: &ExtractCache, extractor: &Arc<dyn PageExtractor>, url: &str, no_cache: bool,
) -> Result<(String, String, bool), scout_client::ProviderError> {
    if !no_cache
        && let Some(entry) = cache.lookup(url)
    {
        return Ok((entry.content, entry.title, true));
    }

    let page = extractor.scrape(url).await?;
    if let Err(e) = cache.store(url, &page.title, &page.content) {
        tracing::warn!("failed to cache extraction for {url}: {e}");
    }

    Ok((page.content, page.title, false))
}

/// Truncate raw content at a character limit, appending a marker.
fn truncate_raw(content: String, limit: usize) -> String {
    if content.chars().count() > limit {
        let cut: String = content.chars().take(limit).collect();
        format!("{cut}\n\n[...truncated at {limit} chars, use --limit N for more]")
    } else {
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_client::{ProviderError, ScrapedPage};
    use scout_core::MemStore;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Extractor that fails for URLs in a deny set.
    struct FakeExtractor {
        fail_urls: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeExtractor {
        fn new(fail_urls: &[&str]) -> Self {
            Self {
                fail_urls: fail_urls.iter().map(|s| s.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageExtractor for FakeExtractor {
        async fn scrape(&self, url: &str) -> Result<ScrapedPage, ProviderError> {
            self.calls.lock().unwrap().push(url.to_string());
            if self.fail_urls.contains(url) {
                return Err(ProviderError::Scrape { status: 500 });
            }
            Ok(ScrapedPage { content: format!("content of {url}"), title: format!("title of {url}") })
        }
    }

    struct FakeAnalyzer;

    #[async_trait]
    impl Analyzer for FakeAnalyzer {
        async fn analyze(
            &self, content: &str, title: &str, _url: &str, context: Option<&str>,
        ) -> Result<String, ProviderError> {
            Ok(format!("analysis[{title}|{}|{}]", content.len(), context.unwrap_or("-")))
        }
    }

    fn make_cache() -> Arc<ExtractCache> {
        Arc::new(ExtractCache::new(Arc::new(MemStore::new()), scout_core::cache::DEFAULT_TTL_MS, 50))
    }

    fn targets(urls: &[&str]) -> Vec<Target> {
        urls.iter()
            .enumerate()
            .map(|(i, url)| Target {
                index: i + 1,
                title: format!("T{}", i + 1),
                url: url.to_string(),
                author: None,
            })
            .collect()
    }

    fn raw_options() -> BatchOptions {
        BatchOptions { raw: true, no_cache: false, limit: 8000, context: None }
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_drops_failures() {
        let cache = make_cache();
        let extractor = Arc::new(FakeExtractor::new(&["https://example.com/2"]));
        let batch = targets(&["https://example.com/1", "https://example.com/2", "https://example.com/3"]);

        let articles = run_batch(cache, extractor, None, batch, raw_options()).await;

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].index, 1);
        assert_eq!(articles[1].index, 3);
    }

    #[tokio::test]
    async fn test_batch_all_fail_is_empty_not_fatal() {
        let cache = make_cache();
        let extractor = Arc::new(FakeExtractor::new(&["https://example.com/1", "https://example.com/2"]));
        let batch = targets(&["https://example.com/1", "https://example.com/2"]);

        let articles = run_batch(cache, extractor, None, batch, raw_options()).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_batch_analyze_mode() {
        let cache = make_cache();
        let extractor = Arc::new(FakeExtractor::new(&[]));
        let batch = targets(&["https://example.com/1"]);
        let options = BatchOptions { raw: false, no_cache: false, limit: 8000, context: Some("q".into()) };

        let articles = run_batch(cache, extractor, Some(Arc::new(FakeAnalyzer)), batch, options).await;

        assert_eq!(articles.len(), 1);
        assert!(articles[0].content.starts_with("analysis[T1|"));
        assert!(articles[0].content.ends_with("|q]"));
    }

    #[tokio::test]
    async fn test_batch_populates_and_reuses_cache() {
        let cache = make_cache();
        let extractor = Arc::new(FakeExtractor::new(&[]));

        let first =
            run_batch(cache.clone(), extractor.clone(), None, targets(&["https://example.com/1"]), raw_options())
                .await;
        assert_eq!(first.len(), 1);
        assert_eq!(extractor.calls.lock().unwrap().len(), 1);

        // second run hits the cache; the extractor is not called again
        let second =
            run_batch(cache.clone(), extractor.clone(), None, targets(&["https://example.com/1"]), raw_options())
                .await;
        assert_eq!(second.len(), 1);
        assert_eq!(extractor.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_no_cache_bypasses_lookup_but_stores() {
        let cache = make_cache();
        let extractor = Arc::new(FakeExtractor::new(&[]));
        let options = BatchOptions { no_cache: true, ..raw_options() };

        run_batch(cache.clone(), extractor.clone(), None, targets(&["https://example.com/1"]), options.clone())
            .await;
        run_batch(cache.clone(), extractor.clone(), None, targets(&["https://example.com/1"]), options).await;

        // lookup bypassed both times
        assert_eq!(extractor.calls.lock().unwrap().len(), 2);
        // but the extraction was still written back
        assert!(cache.lookup("https://example.com/1").is_some());
    }

    #[tokio::test]
    async fn test_raw_truncation_marker() {
        let cache = make_cache();
        let extractor = Arc::new(FakeExtractor::new(&[]));
        let options = BatchOptions { limit: 10, ..raw_options() };

        let articles =
            run_batch(cache, extractor, None, targets(&["https://example.com/long"]), options).await;

        let content = &articles[0].content;
        assert!(content.starts_with("content of"));
        assert!(content.contains("[...truncated at 10 chars, use --limit N for more]"));
    }

    #[test]
    fn test_truncate_raw_under_limit() {
        let content = "short".to_string();
        assert_eq!(truncate_raw(content.clone(), 100), content);
    }

    #[test]
    fn test_article_json_roundtrip() {
        let articles = vec![
            ExtractedArticle {
                index: 1,
                title: "A".into(),
                url: "https://example.com/a".into(),
                author: Some("Ada".into()),
                content: "body a".into(),
            },
            ExtractedArticle {
                index: 3,
                title: "C".into(),
                url: "https://example.com/c".into(),
                author: None,
                content: "body c".into(),
            },
        ];

        let json = serde_json::to_string(&articles).unwrap();
        let parsed: Vec<ExtractedArticle> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].index, 1);
        assert_eq!(parsed[1].index, 3);
        assert_eq!(parsed[1].url, articles[1].url);
        // absent author stays absent through the roundtrip
        assert!(json.contains("\"author\":\"Ada\""));
        assert!(!json.contains("\"author\":null"));
    }

    #[tokio::test]
    async fn test_selector_through_batch_skips_missing_index() {
        use scout_core::session::{DEFAULT_EXPIRY_MS, SearchResult};
        use scout_core::SessionStore;

        let results: Vec<SearchResult> = (1..=6)
            .map(|i| SearchResult {
                title: format!("R{i}"),
                url: format!("https://example.com/{i}"),
                author: None,
                published_date: None,
                summary: None,
            })
            .collect();

        let sessions = SessionStore::new(Arc::new(MemStore::new()), DEFAULT_EXPIRY_MS, 10);
        let session = sessions.create("rust async runtimes", results).unwrap();

        let selector = select::parse_selector(&format!("{}:1,3,7", session.id));
        let loaded = sessions.load(selector.session_id.as_deref()).unwrap().unwrap();
        let indices = select::parse_indices(&selector.action).unwrap();

        let batch: Vec<Target> = select::resolve(&loaded, &indices)
            .into_iter()
            .filter_map(|(index, result)| {
                result.map(|r| Target {
                    index,
                    title: r.title.clone(),
                    url: r.url.clone(),
                    author: r.author.clone(),
                })
            })
            .collect();
        assert_eq!(batch.len(), 2);

        let articles =
            run_batch(make_cache(), Arc::new(FakeExtractor::new(&[])), None, batch, raw_options()).await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].index, 1);
        assert_eq!(articles[1].index, 3);
        assert_eq!(articles[1].url, "https://example.com/3");
    }

    #[test]
    fn test_is_direct_url() {
        assert!(is_direct_url("https://example.com/a"));
        assert!(is_direct_url("http://example.com"));
        assert!(!is_direct_url("a1b:1,2,3"));
        assert!(!is_direct_url(":all"));
    }
}
