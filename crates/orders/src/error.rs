//! Unified error type for callers that drive the whole crate.

use thiserror::Error;

use crate::config::ConfigError;
use crate::remote::RemoteError;
use crate::store::StoreError;

/// Any error surfaced by setup or local order edits.
///
/// Reconciliation itself never returns one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local cache operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Backend client could not be set up.
    #[error("Backend error: {0}")]
    Remote(#[from] RemoteError),

    /// A referenced order is not in the cache.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),
}
