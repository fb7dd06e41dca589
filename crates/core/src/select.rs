//! Selector parsing and index resolution.
//!
//! An extract target like `a1b:1,3,7` names a session and a set of 1-based
//! result indices. Parsing is permissive: non-numeric tokens are dropped,
//! and out-of-range indices resolve to per-index misses rather than errors.

use crate::error::Error;
use crate::session::{SearchResult, Session};

/// Indices selected by the literal token `all`.
const ALL_INDICES: [usize; 5] = [1, 2, 3, 4, 5];

/// A parsed extract selector: optional session id plus an index expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub session_id: Option<String>,
    pub action: String,
}

/// Split a selector string into session id and index expression.
///
/// `"a1b:1,2"` → id `a1b`, action `1,2`; `":1,2"` and `"1,2"` → no id.
pub fn parse_selector(input: &str) -> Selector {
    match input.split_once(':') {
        Some((id, action)) => Selector {
            session_id: if id.is_empty() { None } else { Some(id.to_string()) },
            action: action.to_string(),
        },
        None => Selector { session_id: None, action: input.to_string() },
    }
}

/// Parse an index expression into 1-based indices.
///
/// `all` selects indices 1-5 regardless of how many results exist; otherwise
/// the expression is split on commas/whitespace and non-numeric tokens are
/// silently dropped. Zero usable indices is an error.
pub fn parse_indices(action: &str) -> Result<Vec<usize>, Error> {
    if action == "all" {
        return Ok(ALL_INDICES.to_vec());
    }

    let indices: Vec<usize> = action
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse().ok())
        .collect();

    if indices.is_empty() {
        return Err(Error::InvalidSelection(action.to_string()));
    }
    Ok(indices)
}

/// Resolve indices against a session's results.
///
/// Each requested index maps to its result, or `None` when out of range;
/// missing indices never abort the batch.
pub fn resolve<'a>(session: &'a Session, indices: &[usize]) -> Vec<(usize, Option<&'a SearchResult>)> {
    indices
        .iter()
        .map(|&idx| (idx, idx.checked_sub(1).and_then(|i| session.results.get(i))))
        .collect()
}
