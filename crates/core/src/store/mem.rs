//! In-memory record store for tests.

use super::{RecordMeta, RecordStore};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

struct MemRecord {
    bytes: Vec<u8>,
    modified: i64,
}

/// In-memory [`RecordStore`] backed by a `HashMap`.
///
/// Modification stamps are strictly monotonic so recency ordering is
/// deterministic even when writes land within the same millisecond.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<MemStoreInner>,
}

#[derive(Default)]
struct MemStoreInner {
    records: HashMap<String, MemRecord>,
    seq: i64,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, io::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.records.get(key).map(|r| r.bytes.clone()))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), io::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.seq += 1;
        let modified = inner.seq;
        inner.records.insert(key.to_string(), MemRecord { bytes: bytes.to_vec(), modified });
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, io::Error> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.records.remove(key).is_some())
    }

    fn list(&self) -> Result<Vec<RecordMeta>, io::Error> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .records
            .iter()
            .map(|(key, r)| RecordMeta { key: key.clone(), modified: r.modified, size: r.bytes.len() as u64 })
            .collect())
    }
}
