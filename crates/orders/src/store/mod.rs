//! Durable key-value storage for client-side state.
//!
//! The web client keeps each piece of state as one JSON blob under a
//! well-known key. This module provides the same contract:
//!
//! - [`KeyValueStore`] - synchronous whole-value get/set/remove by key
//! - [`FileStore`] - one `<key>.json` file per key in a data directory
//! - [`MemoryStore`] - in-process map, for tests and throwaway sessions
//! - [`CachedOrders`] - the [`OrderStore`] kept under [`keys::MY_ORDERS`]
//!
//! There is no cross-key transactionality and no locking contract: the
//! last writer wins.

mod file;
mod memory;
mod orders;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use orders::{CachedOrders, OrderStore};

/// Well-known storage keys.
pub mod keys {
    /// The user's orders, as a JSON array.
    pub const MY_ORDERS: &str = "myOrders";
    /// Listings created by the user.
    pub const MY_LISTINGS: &str = "myListings";
    /// Cached marketplace listings.
    pub const ALL_LISTINGS: &str = "allListings";
    /// Admin view of every order.
    pub const ALL_ORDERS: &str = "allOrders";
    pub const USER_PROFILE: &str = "userProfile";
    pub const ADMIN_SETTINGS: &str = "adminSettings";
    pub const THEME: &str = "theme";
    pub const NOTIFICATIONS: &str = "petcare_notifications";
}

/// Errors that can occur when reading or writing stored values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error on key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters that cannot be stored.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Value could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Synchronous whole-value storage addressed by string keys.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes the value under `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing storage cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Keys are used as file names, so only `[A-Za-z0-9_-]` is allowed.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
