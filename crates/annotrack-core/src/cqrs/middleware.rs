//! Command/query classification
//!
//! Every request type implements exactly one of these markers. Commands
//! change stored state and are logged at `info`; queries only read.

use std::fmt::Debug;

/// A request that writes to the store
pub trait Command: Debug + Send + 'static {}

/// A request that only reads from the store
pub trait Query: Debug + Send + 'static {}

/// Log a write request before it runs
pub fn log_command<C: Command>(command: &C) {
    tracing::info!(command = ?command, "Dispatching command");
}

/// Log a read request before it runs
pub fn log_query<Q: Query>(query: &Q) {
    tracing::debug!(query = ?query, "Dispatching query");
}
