//! Key-value record persistence.
//!
//! The cache and the session store both persist JSON records through the
//! [`RecordStore`] trait. The production backend is a directory of
//! `<key>.json` files ([`DirStore`]); tests use an in-memory backend
//! ([`MemStore`]).
//!
//! Corruption is not this layer's concern: a store returns whatever bytes
//! are present, and the owning component maps parse failures to "absent".

pub mod dir;
pub mod mem;

pub use dir::DirStore;
pub use mem::MemStore;

/// Metadata for a stored record, used for recency eviction and stats.
#[derive(Debug, Clone)]
pub struct RecordMeta {
    /// Record key (file stem for directory-backed stores).
    pub key: String,
    /// Last-modified time in epoch milliseconds.
    pub modified: i64,
    /// Record size in bytes.
    pub size: u64,
}

/// Abstract key-value persistence for JSON records.
pub trait RecordStore: Send + Sync {
    /// Read the raw bytes for a key, or None if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, std::io::Error>;

    /// Write (or overwrite) the bytes for a key.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), std::io::Error>;

    /// Delete the record for a key. Returns whether a record existed.
    fn delete(&self, key: &str) -> Result<bool, std::io::Error>;

    /// List all stored records with modification metadata.
    fn list(&self) -> Result<Vec<RecordMeta>, std::io::Error>;
}
