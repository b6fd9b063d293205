//! Local order operations: place, delete, clear, change status.
//!
//! None of these touch the backend; it has no delete or status endpoint
//! for users. Every mutation rewrites the whole cached list.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use petcare_core::demo::without_demo;
use petcare_core::{NewOrder, Order, OrderId, OrderStatus};
use tracing::{info, instrument};

use crate::store::{OrderStore, StoreError};

/// The user's cached orders and the local edits made to them.
///
/// Mutating methods take `&mut self`, so edits through one book are
/// serialized.
#[derive(Debug, Clone)]
pub struct OrderBook<S> {
    store: S,
}

impl<S: OrderStore> OrderBook<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Cached orders with demo records removed.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        without_demo(self.store.read())
    }

    /// Look up one cached order.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders().into_iter().find(|order| &order.id == id)
    }

    /// Record a checkout or adoption submission and persist it immediately.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cache cannot be written.
    pub fn place(&mut self, new_order: NewOrder) -> Result<Order, StoreError> {
        self.place_at(new_order, Utc::now())
    }

    /// [`OrderBook::place`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cache cannot be written.
    #[instrument(skip_all)]
    pub fn place_at(
        &mut self,
        new_order: NewOrder,
        now: DateTime<Utc>,
    ) -> Result<Order, StoreError> {
        let order = new_order.place_at(now);
        let mut orders = self.orders();
        orders.push(order.clone());
        self.store.write(&orders)?;
        info!(order_id = %order.id, "Order placed");
        Ok(order)
    }

    /// Remove the given orders. Ids that are not cached are ignored.
    ///
    /// Returns how many orders were removed. Nothing is written when
    /// nothing matched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cache cannot be written.
    #[instrument(skip_all, fields(requested = ids.len()))]
    pub fn delete(&mut self, ids: &[OrderId]) -> Result<usize, StoreError> {
        let doomed: HashSet<&OrderId> = ids.iter().collect();
        let orders = self.orders();
        let before = orders.len();
        let kept: Vec<Order> = orders
            .into_iter()
            .filter(|order| !doomed.contains(&order.id))
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            self.store.write(&kept)?;
            info!(removed, "Orders deleted");
        }
        Ok(removed)
    }

    /// Remove every cached order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cache cannot be written.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.write(&[])?;
        info!("Order cache cleared");
        Ok(())
    }

    /// Change the status of one order locally.
    ///
    /// Returns `false` without writing if the order is not cached.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cache cannot be written.
    #[instrument(skip(self), fields(order_id = %id))]
    pub fn set_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<bool, StoreError> {
        let mut orders = self.orders();
        let Some(order) = orders.iter_mut().find(|order| &order.id == id) else {
            return Ok(false);
        };
        order.status = status;
        self.store.write(&orders)?;
        info!(%status, "Order status changed");
        Ok(true)
    }
}
