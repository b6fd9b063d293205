//! The order record shared by the local cache and the backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::OrderId;
use super::lenient;
use super::price::Price;
use super::status::{OrderOrigin, OrderStatus, OrderType};

/// One placed purchase or adoption request.
///
/// Field names follow the camelCase JSON used in browser storage and by the
/// backend. Fields this type does not model are kept in [`Order::extra`] and
/// written back unchanged, so a read/write cycle never drops backend data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Server-issued or client-generated identifier.
    pub id: OrderId,
    /// Display name of the purchased product or adopted pet.
    #[serde(default, deserialize_with = "lenient::string")]
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub buyer_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
    /// Unit price; zero means a free adoption.
    #[serde(default)]
    pub price: Price,
    #[serde(default = "lenient::one", deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Provenance tag. Absent for real orders from the backend.
    #[serde(
        default,
        deserialize_with = "lenient::origin",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<OrderOrigin>,
    /// Unmodelled fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// An order with the given id and every other field at its default.
    #[must_use]
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            product_name: String::new(),
            buyer_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            price: Price::ZERO,
            quantity: lenient::one(),
            status: OrderStatus::default(),
            date: None,
            created_at: None,
            source: None,
            extra: Map::new(),
        }
    }

    /// Adoption or purchase, derived from the price.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        if self.price.is_free() {
            OrderType::PetAdoption
        } else {
            OrderType::ProductPurchase
        }
    }

    /// The timestamp used for sorting and display: `date`, else
    /// `createdAt`, else the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.date
            .or(self.created_at)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.total(self.quantity)
    }

    /// Whether this is seeded demo/test data. See [`crate::demo`].
    #[must_use]
    pub fn is_demo(&self) -> bool {
        crate::demo::is_demo(self)
    }
}

/// Checkout or adoption form submission, before it becomes an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub product_name: String,
    pub buyer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub price: Price,
    pub quantity: u32,
}

impl NewOrder {
    /// Stamp the submission as a user-placed pending order with a fresh
    /// client-generated id.
    #[must_use]
    pub fn place_at(self, now: DateTime<Utc>) -> Order {
        Order {
            id: OrderId::generate_at(now),
            product_name: self.product_name,
            buyer_name: self.buyer_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            price: self.price,
            quantity: self.quantity.max(1),
            status: OrderStatus::Pending,
            date: Some(now),
            created_at: Some(now),
            source: Some(OrderOrigin::User),
            extra: Map::new(),
        }
    }
}
