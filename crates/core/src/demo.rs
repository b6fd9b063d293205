//! Detection of seeded demo and test orders.
//!
//! The backend ships seed records that are only partially tagged with
//! `source: "demo"`. Untagged seed data is recognised by the sentinel
//! strings it was generated with. A matching record is never shown to the
//! user and never persisted as a real order.

use crate::types::{Order, OrderOrigin};

/// Id fragments used by seed data.
pub const DEMO_ID_MARKERS: &[&str] = &["demo-order-", "test-"];

/// Product name fragments used by seed data.
pub const DEMO_PRODUCT_MARKERS: &[&str] = &["Test Product", "Demo"];

/// Buyer name fragments used by seed data.
pub const DEMO_BUYER_MARKERS: &[&str] = &["Demo User"];

/// Email fragments used by seed data.
pub const DEMO_EMAIL_MARKERS: &[&str] = &["test@"];

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| haystack.contains(marker))
}

/// Returns `true` if `order` is demo/seed data.
///
/// Matching is case-sensitive and by substring.
#[must_use]
pub fn is_demo(order: &Order) -> bool {
    order.source == Some(OrderOrigin::Demo)
        || contains_any(order.id.as_str(), DEMO_ID_MARKERS)
        || contains_any(&order.product_name, DEMO_PRODUCT_MARKERS)
        || contains_any(&order.buyer_name, DEMO_BUYER_MARKERS)
        || contains_any(&order.email, DEMO_EMAIL_MARKERS)
}

/// Removes demo records, keeping the order of the rest.
#[must_use]
pub fn without_demo(orders: Vec<Order>) -> Vec<Order> {
    orders.into_iter().filter(|order| !is_demo(order)).collect()
}
