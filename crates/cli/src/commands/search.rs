//! Search command: query the web and open an extraction session.

use crate::cli::SearchArgs;
use crate::output::{print_search_results, status};
use chrono::{Duration, SecondsFormat, Utc};
use scout_client::exa::{ExaClient, ExaConfig};
use scout_client::SearchOptions;
use scout_core::{AppConfig, DirStore, Error, SessionStore};
use std::sync::Arc;

pub async fn run(config: &AppConfig, args: SearchArgs) -> Result<(), Error> {
    let query = args.query.join(" ");
    let options = build_options(config, &args);

    status(&format!("\n🔍 \"{query}\"{}", describe_params(&options)));

    let api_key = config.require_exa_api_key()?;
    let client = ExaClient::new(ExaConfig { api_key: api_key.to_string(), timeout: config.timeout(), ..Default::default() })
        .map_err(|e| Error::Provider(e.to_string()))?;

    let results = client
        .search(&query, &options)
        .await
        .map_err(|e| Error::Provider(e.to_string()))?;

    if results.is_empty() {
        status("No results found.");
        if args.json {
            println!("{}", serde_json::json!({ "results": [] }));
        }
        return Ok(());
    }

    let store = Arc::new(DirStore::new(&config.session_dir));
    let sessions = SessionStore::new(store, config.session_expiry_ms(), config.max_sessions);
    let session = sessions.create(&query, results)?;

    print_search_results(&session, args.json);
    Ok(())
}

/// Merge CLI flags over config defaults into provider search options.
fn build_options(config: &AppConfig, args: &SearchArgs) -> SearchOptions {
    let mut options = SearchOptions {
        search_type: args.search_type.clone().or_else(|| config.defaults.search_type.clone()),
        category: args.category.clone(),
        num_results: args.num.or(config.defaults.num_results),
        livecrawl: args.livecrawl.clone(),
        include_domains: config.defaults.include_domains.clone(),
        exclude_domains: config.defaults.exclude_domains.clone(),
        ..Default::default()
    };

    if let Some(after) = &args.after {
        options.start_published_date = Some(format!("{after}T00:00:00.000Z"));
    }
    if let Some(before) = &args.before {
        options.end_published_date = Some(format!("{before}T23:59:59.000Z"));
    }
    if let Some(days) = args.days {
        let start = Utc::now() - Duration::days(days);
        options.start_published_date = Some(start.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    if let Some(domains) = &args.domains {
        options.include_domains = split_list(domains);
    }
    if let Some(exclude) = &args.exclude {
        options.exclude_domains = split_list(exclude);
    }

    options
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

/// Compact `[key=value, ...]` suffix for the search status line.
fn describe_params(options: &SearchOptions) -> String {
    let mut params = Vec::new();
    if let Some(t) = &options.search_type {
        params.push(format!("type={t}"));
    }
    if let Some(c) = &options.category {
        params.push(format!("category={c}"));
    }
    if let Some(d) = &options.start_published_date {
        params.push(format!("after={}", &d[..d.len().min(10)]));
    }
    if !options.include_domains.is_empty() {
        params.push(format!("domains={}", options.include_domains.join(",")));
    }

    if params.is_empty() { String::new() } else { format!(" [{}]", params.join(", ")) }
}
