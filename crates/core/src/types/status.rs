//! Status and classification enums for orders.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Error returned when a status or type string is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

/// Order fulfillment status.
///
/// Parsed case-insensitively. When deserializing a stored or remote order,
/// an absent, null or unrecognized status is read as [`OrderStatus::Pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Completed,
        Self::Cancelled,
    ];

    /// The wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant {
                kind: "order status",
                value: s.to_owned(),
            })
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default())
    }
}

/// What kind of order this is. Derived from the price, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// A free adoption request (price is zero).
    PetAdoption,
    /// A paid product purchase.
    ProductPurchase,
}

impl OrderType {
    /// Human-readable label shown in listings.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PetAdoption => "Pet Adoption",
            Self::ProductPurchase => "Product Purchase",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adoption" | "pet adoption" | "pet-adoption" => Ok(Self::PetAdoption),
            "purchase" | "product purchase" | "product-purchase" => Ok(Self::ProductPurchase),
            _ => Err(UnknownVariant {
                kind: "order type",
                value: s.to_owned(),
            }),
        }
    }
}

/// Where an order record came from.
///
/// Records without a `source` field are real orders from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderOrigin {
    /// Placed by the user on this client.
    User,
    /// Synthetic seed data; never shown or persisted as a real order.
    Demo,
    /// Any other provenance tag.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_case_insensitive() {
        assert_eq!("Shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!(" DELIVERED ".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_deserialize_falls_back_to_pending() {
        let s: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(s, OrderStatus::Completed);

        for raw in ["null", "\"on-hold\"", "7"] {
            let s: OrderStatus = serde_json::from_str(raw).unwrap();
            assert_eq!(s, OrderStatus::Pending, "{raw}");
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_order_type_labels() {
        assert_eq!(OrderType::PetAdoption.to_string(), "Pet Adoption");
        assert_eq!("purchase".parse::<OrderType>().unwrap(), OrderType::ProductPurchase);
        assert_eq!("Pet Adoption".parse::<OrderType>().unwrap(), OrderType::PetAdoption);
    }

    #[test]
    fn test_origin_unknown_tag() {
        let o: OrderOrigin = serde_json::from_str("\"import\"").unwrap();
        assert_eq!(o, OrderOrigin::Unknown);
        let o: OrderOrigin = serde_json::from_str("\"demo\"").unwrap();
        assert_eq!(o, OrderOrigin::Demo);
    }
}
