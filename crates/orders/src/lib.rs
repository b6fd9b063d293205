//! Petcare order sync library.
//!
//! Keeps the user's order list in a durable local cache and reconciles it
//! with the backend on demand.
//!
//! # Components
//!
//! - [`store`] - Key-value cache and the [`OrderStore`] over it
//! - [`remote`] - Backend order API ([`OrderSource`], [`HttpOrderSource`])
//! - [`reconcile`] - [`Reconciler`] merging the two
//! - [`book`] - Local edits: place, delete, clear, change status
//! - [`config`] - Environment-driven [`SyncConfig`]
//!
//! # Failure model
//!
//! Reconciliation never fails; it degrades to whatever data is available.
//! Only setup and explicit local edits return errors.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod book;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod remote;
pub mod store;

pub use book::OrderBook;
pub use config::{ConfigError, SyncConfig};
pub use error::Error;
pub use reconcile::{Reconciler, Reconciliation, SyncOutcome, merge_orders};
pub use remote::{HttpOrderSource, OrderSource, RemoteError, parse_orders_response};
pub use store::{CachedOrders, FileStore, KeyValueStore, MemoryStore, OrderStore, StoreError};

/// A reconciler over the on-disk cache and the HTTP backend.
pub type LocalReconciler = Reconciler<CachedOrders<FileStore>, HttpOrderSource>;

/// Open the cache in `config.data_dir` and connect it to `config.api_url`.
///
/// # Errors
///
/// Returns `Error::Store` if the data directory cannot be created, or
/// `Error::Remote` if the HTTP client cannot be built.
pub fn open(config: &SyncConfig) -> Result<LocalReconciler, Error> {
    let store = CachedOrders::new(FileStore::open(&config.data_dir)?);
    let source = HttpOrderSource::from_config(config)?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        api_url = %config.api_url,
        "Order sync opened"
    );
    Ok(Reconciler::new(store, source))
}
