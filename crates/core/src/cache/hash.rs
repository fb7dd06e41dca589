//! URL fingerprinting for cache keys.

use sha2::{Digest, Sha256};

/// Length of the hex fingerprint used as a cache key.
const FINGERPRINT_LEN: usize = 16;

/// Compute a stable fingerprint for a URL.
///
/// A truncated SHA-256 digest: deterministic, compact, and collision-tolerant
/// for cache-key purposes (not a security boundary).
pub fn fingerprint(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..FINGERPRINT_LEN].to_string()
}
