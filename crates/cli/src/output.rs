//! Terminal and JSON output rendering.
//!
//! Results and JSON go to stdout; progress and status lines go to stderr so
//! piped output stays clean.

use crate::commands::extract::ExtractedArticle;
use scout_core::{CacheStats, Session};
use std::path::Path;

/// Separator line between extracted articles.
fn separator() -> String {
    "═".repeat(70)
}

/// Print a status/progress line to stderr.
pub fn status(message: &str) {
    eprintln!("{message}");
}

/// Truncate a string to at most `limit` characters.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    if s.chars().count() > limit { s.chars().take(limit).collect() } else { s.to_string() }
}

/// Hostname of a URL with any `www.` prefix stripped, for compact display.
fn display_domain(raw_url: &str) -> String {
    url::Url::parse(raw_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.strip_prefix("www.").unwrap_or(h).to_string()))
        .unwrap_or_default()
}

/// Print a search session: numbered results plus the extract hint.
pub fn print_search_results(session: &Session, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(session).unwrap_or_default());
        return;
    }

    println!("\n[scout:{}] {} results:\n", session.id, session.results.len());

    for (i, result) in session.results.iter().take(10).enumerate() {
        let date = result
            .published_date
            .as_deref()
            .map(|d| format!(" [{}]", truncate_chars(d, 10)))
            .unwrap_or_default();
        let author = result
            .author
            .as_deref()
            .map(|a| format!(" — {}", truncate_chars(a, 30)))
            .unwrap_or_default();

        println!("[{}] {}{}", i + 1, truncate_chars(&result.title, 70), date);
        println!("    {}{}", display_domain(&result.url), author);
        if let Some(summary) = result.summary.as_deref()
            && !summary.is_empty()
        {
            let quoted =
                if summary.chars().count() > 90 { format!("{}...", truncate_chars(summary, 90)) } else { summary.to_string() };
            println!("    \"{quoted}\"");
        }
        println!();
    }

    println!("Extract: scout extract '{id}:1,2,3' or scout extract '{id}:all'", id = session.id);
}

/// Print extracted articles with separator framing.
pub fn print_articles(articles: &[ExtractedArticle], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(articles).unwrap_or_default());
        return;
    }

    let sep = separator();
    for article in articles {
        println!("\n{sep}");
        println!("[{}] {}", article.index, article.title);
        println!("{}", article.url);
        if let Some(author) = &article.author {
            println!("Author: {author}");
        }
        println!("{sep}\n");
        println!("{}", article.content);
        println!();
    }
}

/// Print extraction cache statistics.
pub fn print_cache_stats(stats: &CacheStats, directory: &Path, ttl_hours: i64, json: bool) {
    if json {
        let payload = serde_json::json!({
            "valid": stats.valid,
            "expired": stats.expired,
            "totalSizeKB": format!("{:.1}", stats.total_size_bytes as f64 / 1024.0),
            "directory": directory.display().to_string(),
            "ttlHours": ttl_hours,
        });
        println!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
        return;
    }

    println!(
        "Cache: {} valid, {} expired, {:.1} KB total",
        stats.valid,
        stats.expired,
        stats.total_size_bytes as f64 / 1024.0
    );
    println!("Location: {}", directory.display());
    println!("TTL: {ttl_hours} hours");
    if stats.expired > 0 {
        println!("\nRun 'scout cache clear' to remove expired items.");
    }
}
