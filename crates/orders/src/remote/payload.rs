//! Response bodies of the backend order API.

use petcare_core::Order;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthResponse {
    /// Healthy iff the database status reports a live connection.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.database.as_deref().is_some_and(database_is_connected)
    }
}

/// Whether a database status string means "connected".
///
/// The status must mention `connected`; `disconnected` and
/// `not connected` also contain that word and are rejected.
#[must_use]
pub fn database_is_connected(status: &str) -> bool {
    let status = status.to_ascii_lowercase();
    status.contains("connected")
        && !status.contains("disconnected")
        && !status.contains("not connected")
}

/// The accepted shapes of `GET /orders/user/{email}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OrdersResponse {
    Bare(Vec<Value>),
    Wrapped { orders: Vec<Value> },
    Data { data: Vec<Value> },
}

/// Normalize an orders response body to a list of orders.
///
/// Accepts a bare array, `{ "orders": [...] }` or `{ "data": [...] }`.
/// Any other shape yields an empty list. Elements that are not valid
/// orders are skipped; an element with `_id` but no `id` uses `_id`.
#[must_use]
pub fn parse_orders_response(body: Value) -> Vec<Order> {
    let items = match serde_json::from_value::<OrdersResponse>(body) {
        Ok(OrdersResponse::Bare(items)
        | OrdersResponse::Wrapped { orders: items }
        | OrdersResponse::Data { data: items }) => items,
        Err(_) => {
            debug!("Unrecognised orders payload, treating as empty");
            return Vec::new();
        }
    };

    let total = items.len();
    let orders: Vec<Order> = items
        .into_iter()
        .map(adopt_mongo_id)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if orders.len() < total {
        debug!(skipped = total - orders.len(), "Skipped malformed remote orders");
    }
    orders
}

fn adopt_mongo_id(mut item: Value) -> Value {
    if let Value::Object(map) = &mut item
        && !map.contains_key("id")
        && let Some(id) = map.get("_id").cloned()
    {
        map.insert("id".to_owned(), id);
    }
    item
}
