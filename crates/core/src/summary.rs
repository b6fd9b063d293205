//! Aggregate figures for the orders dashboard.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Order, OrderStatus, OrderType};

/// Counts and totals over a set of orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub total: usize,
    pub adoptions: usize,
    pub purchases: usize,
    /// Number of orders per status, only for statuses that occur.
    pub by_status: BTreeMap<&'static str, usize>,
    /// Sum of price × quantity over non-cancelled orders, saturating at
    /// [`Decimal::MAX`].
    pub revenue: Decimal,
}

impl OrderSummary {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut summary, order| {
            summary.total += 1;
            match order.order_type() {
                OrderType::PetAdoption => summary.adoptions += 1,
                OrderType::ProductPurchase => summary.purchases += 1,
            }
            *summary.by_status.entry(order.status.as_str()).or_default() += 1;
            if order.status != OrderStatus::Cancelled {
                summary.revenue = summary
                    .revenue
                    .checked_add(order.line_total())
                    .unwrap_or(Decimal::MAX);
            }
            summary
        })
    }

    /// Orders in `status`.
    #[must_use]
    pub fn count(&self, status: OrderStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}
