//! Filtering and sorting of order listings.
//!
//! Applied after reconciliation, on whatever sequence the reconciler
//! returned. Sorting coerces a missing date to the Unix epoch and a missing
//! price to zero, so it cannot fail on partial records.

use core::fmt;

use crate::types::{Order, OrderStatus, OrderType};

/// Sort order for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    DateAsc,
    /// Newest first.
    #[default]
    DateDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    /// Stable sort of `orders` in place.
    pub fn sort(self, orders: &mut [Order]) {
        match self {
            Self::DateAsc => orders.sort_by_key(Order::timestamp),
            Self::DateDesc => orders.sort_by_key(|o| std::cmp::Reverse(o.timestamp())),
            Self::PriceAsc => orders.sort_by_key(|o| o.price),
            Self::PriceDesc => orders.sort_by_key(|o| std::cmp::Reverse(o.price)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        })
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-asc" | "oldest" => Ok(Self::DateAsc),
            "date-desc" | "newest" => Ok(Self::DateDesc),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            _ => Err(format!("invalid sort key: {s}")),
        }
    }
}

/// Listing filter. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    /// Case-insensitive substring over id, product, buyer and email.
    pub search: Option<String>,
    /// `None` keeps the input order.
    pub sort: Option<SortKey>,
}

impl OrderQuery {
    /// Whether `order` passes the filters (sorting aside).
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|status| order.status != status) {
            return false;
        }
        if self.order_type.is_some_and(|kind| order.order_type() != kind) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [
                    order.id.as_str(),
                    &order.product_name,
                    &order.buyer_name,
                    &order.email,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }

    /// Filter then sort a copy of `orders`.
    #[must_use]
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        let mut selected: Vec<Order> = orders
            .iter()
            .filter(|order| self.matches(order))
            .cloned()
            .collect();
        if let Some(sort) = self.sort {
            sort.sort(&mut selected);
        }
        selected
    }
}
