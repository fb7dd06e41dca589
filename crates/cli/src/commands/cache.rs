//! Cache command: stats and clearing.

use crate::cli::{CacheAction, CacheArgs};
use crate::output::print_cache_stats;
use scout_core::{AppConfig, DirStore, Error, ExtractCache};
use std::sync::Arc;

pub fn run(config: &AppConfig, args: CacheArgs) -> Result<(), Error> {
    let cache = ExtractCache::new(
        Arc::new(DirStore::new(&config.cache_dir)),
        config.cache_ttl_ms(),
        config.cache_max_entries,
    );

    match args.action {
        Some(CacheAction::Clear) => {
            let count = cache.clear()?;
            if args.json {
                println!("{}", serde_json::json!({ "cleared": count }));
            } else if count > 0 {
                println!("Cleared {count} cached extraction(s).");
            } else {
                println!("Cache is empty.");
            }
        }
        None => {
            let stats = cache.stats()?;
            print_cache_stats(&stats, &config.cache_dir, config.cache_ttl_hours, args.json);
        }
    }

    Ok(())
}
