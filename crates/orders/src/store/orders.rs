//! The cached order list.

use petcare_core::Order;
use serde_json::Value;
use tracing::{debug, warn};

use super::{KeyValueStore, StoreError, keys};

/// Read/write access to the locally cached order list.
///
/// This is the only surface the reconciler and the order book use, so an
/// in-memory fake can stand in for durable storage in tests.
pub trait OrderStore {
    /// The cached orders. Absent or unreadable data reads as empty.
    fn read(&self) -> Vec<Order>;

    /// Replace the cached orders entirely.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be serialized or stored.
    fn write(&self, orders: &[Order]) -> Result<(), StoreError>;
}

/// [`OrderStore`] kept as a JSON array under one key of a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CachedOrders<K> {
    kv: K,
    key: &'static str,
}

impl<K: KeyValueStore> CachedOrders<K> {
    /// Orders stored under [`keys::MY_ORDERS`].
    #[must_use]
    pub const fn new(kv: K) -> Self {
        Self::with_key(kv, keys::MY_ORDERS)
    }

    /// Orders stored under a different key (e.g. [`keys::ALL_ORDERS`]).
    #[must_use]
    pub const fn with_key(kv: K, key: &'static str) -> Self {
        Self { kv, key }
    }

    /// The underlying key-value store.
    #[must_use]
    pub const fn kv(&self) -> &K {
        &self.kv
    }
}

impl<K: KeyValueStore> OrderStore for CachedOrders<K> {
    fn read(&self) -> Vec<Order> {
        let raw = match self.kv.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = self.key, error = %e, "Failed to read cached orders");
                return Vec::new();
            }
        };

        let items: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(key = self.key, error = %e, "Cached orders are corrupt, treating as empty");
                return Vec::new();
            }
        };

        let total = items.len();
        let orders: Vec<Order> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if orders.len() < total {
            debug!(
                key = self.key,
                skipped = total - orders.len(),
                "Skipped malformed cached orders"
            );
        }
        orders
    }

    fn write(&self, orders: &[Order]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(orders)?;
        self.kv.set(self.key, &raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use petcare_core::{OrderId, OrderStatus};

    use super::*;
    use crate::store::MemoryStore;

    fn order(id: &str) -> Order {
        Order::new(OrderId::parse(id).unwrap())
    }

    #[test]
    fn test_absent_key_reads_empty() {
        let store = CachedOrders::new(MemoryStore::new());
        assert!(store.read().is_empty());
    }

    #[test]
    fn test_corrupt_value_reads_empty() {
        for raw in ["{not json", "null", "{\"id\":\"A\"}", "42"] {
            let store = CachedOrders::new(MemoryStore::with_value(keys::MY_ORDERS, raw).unwrap());
            assert!(store.read().is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let raw = r#"[{"id":"A"},{"productName":"no id"},7,{"id":"B","status":"shipped"}]"#;
        let store = CachedOrders::new(MemoryStore::with_value(keys::MY_ORDERS, raw).unwrap());
        let orders = store.read();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].status, OrderStatus::Shipped);
    }

    #[test]
    fn test_write_then_read() {
        let kv = Arc::new(MemoryStore::new());
        let store = CachedOrders::new(Arc::clone(&kv));
        store.write(&[order("A"), order("B")]).unwrap();

        let ids: Vec<_> = store.read().into_iter().map(|o| o.id.into_inner()).collect();
        assert_eq!(ids, ["A", "B"]);
        assert!(kv.get(keys::MY_ORDERS).unwrap().unwrap().starts_with('['));
    }

    #[test]
    fn test_corrupt_value_overwritten_by_next_write() {
        let kv = Arc::new(MemoryStore::with_value(keys::MY_ORDERS, "garbage").unwrap());
        let store = CachedOrders::new(Arc::clone(&kv));
        store.write(&[order("C")]).unwrap();
        assert_eq!(store.read().len(), 1);
    }

    #[test]
    fn test_custom_key_is_isolated() {
        let kv = Arc::new(MemoryStore::new());
        let mine = CachedOrders::new(Arc::clone(&kv));
        let all = CachedOrders::with_key(Arc::clone(&kv), keys::ALL_ORDERS);
        all.write(&[order("X")]).unwrap();
        assert!(mine.read().is_empty());
        assert_eq!(all.read().len(), 1);
    }
}
