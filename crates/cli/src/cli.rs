//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fast, structured web research from the terminal.
#[derive(Debug, Parser)]
#[command(name = "scout", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the web and open an extraction session
    Search(SearchArgs),
    /// Extract articles from a session selector or a direct URL
    Extract(ExtractArgs),
    /// Show extraction cache stats or clear the cache
    Cache(CacheArgs),
    /// Show API key status or save a key
    Setup(SetupArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Query terms (joined with spaces)
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Search type: auto, neural, keyword
    #[arg(long = "type", value_name = "TYPE")]
    pub search_type: Option<String>,

    /// Result category: news, research paper, tweet, company, people, pdf
    #[arg(long)]
    pub category: Option<String>,

    /// Results published after DATE (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Results published before DATE (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Results from the last N days
    #[arg(long, value_name = "N")]
    pub days: Option<i64>,

    /// Comma-separated domains to include
    #[arg(long, value_name = "LIST")]
    pub domains: Option<String>,

    /// Comma-separated domains to exclude
    #[arg(long, value_name = "LIST")]
    pub exclude: Option<String>,

    /// Live-crawl mode: never, fallback, preferred, always
    #[arg(long, value_name = "MODE")]
    pub livecrawl: Option<String>,

    /// Number of results
    #[arg(long, value_name = "N")]
    pub num: Option<usize>,

    /// Output as JSON (for piping)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Session selector ('abc:1,2,3', 'abc:all', ':1,2') or a direct URL
    pub target: String,

    /// Research question for targeted analysis
    #[arg(short = 'c', long, value_name = "TEXT")]
    pub context: Option<String>,

    /// Read research context from a file
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<PathBuf>,

    /// Clean markdown only (skip analysis)
    #[arg(long)]
    pub raw: bool,

    /// Character limit for raw mode
    #[arg(long, value_name = "N", default_value_t = 8000)]
    pub limit: usize,

    /// Bypass cache, force fresh extraction
    #[arg(long)]
    pub no_cache: bool,

    /// Output as JSON (for piping)
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: Option<CacheAction>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Delete all cached extractions
    Clear,
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// Service to configure: exa, firecrawl, gemini
    pub service: Option<String>,

    /// API key to save for the service
    pub key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from(["scout", "search", "rust", "async", "--num", "5", "--json"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.query, vec!["rust", "async"]);
        assert_eq!(args.num, Some(5));
        assert!(args.json);
    }

    #[test]
    fn test_parse_extract_selector() {
        let cli = Cli::parse_from(["scout", "extract", "a1b:1,3,7", "--raw", "--limit", "500"]);
        let Command::Extract(args) = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(args.target, "a1b:1,3,7");
        assert!(args.raw);
        assert_eq!(args.limit, 500);
        assert!(!args.no_cache);
    }

    #[test]
    fn test_parse_extract_context() {
        let cli = Cli::parse_from(["scout", "extract", ":all", "-c", "async runtimes"]);
        let Command::Extract(args) = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(args.context.as_deref(), Some("async runtimes"));
    }

    #[test]
    fn test_parse_cache_clear() {
        let cli = Cli::parse_from(["scout", "cache", "clear"]);
        let Command::Cache(args) = cli.command else {
            panic!("expected cache command");
        };
        assert!(matches!(args.action, Some(CacheAction::Clear)));
    }
}
