//! scout command implementations.

pub mod cache;
pub mod extract;
pub mod search;
pub mod setup;
