//! Unified error types for scout.

use crate::config::ConfigError;

/// Unified error type for the scout pipeline.
///
/// Per-target provider failures inside a batch are caught at the target
/// boundary and reported as status lines; everything here propagates to the
/// invocation boundary and terminates the command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external provider call failed.
    #[error("{0}")]
    Provider(String),

    /// No session matched the given id (or no recent search exists).
    #[error("{}", session_not_found_message(.0))]
    SessionNotFound(Option<String>),

    /// The selector parsed to zero usable indices.
    #[error("invalid selection: {0}. Use numbers like '1,2,3' or 'all'")]
    InvalidSelection(String),

    /// Record store I/O failure (not corruption, which degrades to absent).
    #[error("store error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid input at the command boundary.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

fn session_not_found_message(id: &Option<String>) -> String {
    match id {
        Some(id) => format!("no session: {id}"),
        None => "no recent search. Run a search first".to_string(),
    }
}
