//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{KeyValueStore, StoreError, validate_key};

/// Key-value store held in process memory.
///
/// Nothing survives the process. Used as the injected fake in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one raw value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` if `key` would be rejected by `get`.
    pub fn with_value(key: &str, value: &str) -> Result<Self, StoreError> {
        let store = Self::new();
        store.set(key, value)?;
        Ok(store)
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "\"dark\"").unwrap();
        store.set("theme", "\"light\"").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"light\""));
        assert_eq!(store.len(), 1);

        store.remove("theme").unwrap();
        store.remove("theme").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_bad_key() {
        let store = MemoryStore::new();
        assert!(store.set("a/b", "1").is_err());
    }

    #[test]
    fn test_with_value_validates_key() {
        let store = MemoryStore::with_value("myOrders", "[]").unwrap();
        assert_eq!(store.get("myOrders").unwrap().as_deref(), Some("[]"));

        assert!(matches!(
            MemoryStore::with_value("../escape", "[]"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
