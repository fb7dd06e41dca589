//! Search session persistence.
//!
//! A search call produces a [`Session`]: the query plus its ordered results,
//! addressable by a short opaque id. Sessions are persisted under their own
//! id and under a `latest` alias that always mirrors the newest session.
//! Stores are pruned by recency; reads apply a lazy expiry check.

use crate::store::RecordStore;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Alias record always overwritten by the newest session.
const LATEST_KEY: &str = "latest";

/// Default expiry window for sessions (2 hours).
pub const DEFAULT_EXPIRY_MS: i64 = 2 * 60 * 60 * 1000;

/// Default maximum number of retained id-keyed sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10;

/// A single search result inside a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// An immutable snapshot of one search call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

/// Session store over a [`RecordStore`].
pub struct SessionStore {
    store: Arc<dyn RecordStore>,
    expiry_ms: i64,
    max_sessions: usize,
}

/// Generate a short opaque session id (3 hex chars).
///
/// Collisions are tolerated: a new session silently overwrites an existing
/// record for the same id.
pub fn generate_session_id() -> String {
    let n: u16 = rand::thread_rng().gen_range(0..0x1000);
    format!("{n:03x}")
}

impl SessionStore {
    pub fn new(store: Arc<dyn RecordStore>, expiry_ms: i64, max_sessions: usize) -> Self {
        Self { store, expiry_ms, max_sessions }
    }

    /// Create and persist a new session, then prune old ones.
    pub fn create(&self, query: &str, results: Vec<SearchResult>) -> Result<Session, std::io::Error> {
        let session = Session {
            id: generate_session_id(),
            query: query.to_string(),
            results,
            timestamp: now_ms(),
        };

        let bytes = serde_json::to_vec_pretty(&session).expect("session serializes");
        self.store.put(&session.id, &bytes)?;
        self.store.put(LATEST_KEY, &bytes)?;
        self.prune()?;

        Ok(session)
    }

    /// Load a session by id, by prefix, or (with no id) via the `latest` alias.
    ///
    /// Expired and corrupt sessions read as `None`; unlike the cache, no
    /// deletion happens on this path.
    pub fn load(&self, id: Option<&str>) -> Result<Option<Session>, std::io::Error> {
        let key = match id {
            None => LATEST_KEY.to_string(),
            Some(id) => match self.store.get(id)? {
                Some(_) => id.to_string(),
                None => match self.match_prefix(id)? {
                    Some(key) => key,
                    None => return Ok(None),
                },
            },
        };

        let Some(bytes) = self.store.get(&key)? else {
            return Ok(None);
        };

        let Ok(session) = serde_json::from_slice::<Session>(&bytes) else {
            tracing::debug!(key, "corrupt session record treated as not found");
            return Ok(None);
        };

        if now_ms() - session.timestamp > self.expiry_ms {
            tracing::debug!(key, "session expired");
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// First stored session id starting with the given prefix.
    fn match_prefix(&self, prefix: &str) -> Result<Option<String>, std::io::Error> {
        Ok(self
            .store
            .list()?
            .into_iter()
            .map(|m| m.key)
            .find(|key| key != LATEST_KEY && key.starts_with(prefix)))
    }

    /// Delete id-keyed sessions beyond the retention limit, newest kept.
    ///
    /// The `latest` alias is never pruned.
    fn prune(&self) -> Result<(), std::io::Error> {
        let mut records: Vec<_> = self
            .store
            .list()?
            .into_iter()
            .filter(|m| m.key != LATEST_KEY)
            .collect();
        records.sort_by(|a, b| b.modified.cmp(&a.modified));

        for record in records.iter().skip(self.max_sessions) {
            tracing::debug!(key = record.key, "pruning session beyond limit");
            self.store.delete(&record.key)?;
        }
        Ok(())
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
