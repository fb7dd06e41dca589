//! Core types and shared functionality for scout.
//!
//! This crate provides:
//! - Record store abstraction (directory-of-files and in-memory backends)
//! - Extraction cache with TTL and recency eviction
//! - Search session store with expiry, pruning, and a "latest" alias
//! - Selector parsing and index resolution
//! - Layered configuration
//! - Unified error types

pub mod cache;
pub mod config;
pub mod error;
pub mod select;
pub mod session;
pub mod store;

pub use cache::{CacheEntry, CacheStats, ExtractCache};
pub use config::AppConfig;
pub use error::Error;
pub use select::Selector;
pub use session::{SearchResult, Session, SessionStore};
pub use store::{DirStore, MemStore, RecordStore};
