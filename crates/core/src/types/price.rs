//! Non-negative unit price using decimal arithmetic.
//!
//! A price of zero marks a free adoption rather than a product purchase.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unit price of an order line.
///
/// Always non-negative. Deserialization is lenient: a JSON number or a
/// numeric string is accepted, and anything missing, unparseable or
/// negative collapses to zero so that sorting and totals never fail.
/// Serializes as a JSON number, or as a string when an `f64` cannot hold
/// the amount exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price (free adoption).
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, returning `None` for negative amounts.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (!amount.is_sign_negative() || amount.is_zero()).then_some(Self(amount.normalize()))
    }

    /// Create a price, treating negative amounts as zero.
    #[must_use]
    pub fn saturating(amount: Decimal) -> Self {
        Self::new(amount).unwrap_or(Self::ZERO)
    }

    /// Lenient parse of a textual amount such as `"12.50"`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        s.trim()
            .parse::<Decimal>()
            .ok()
            .map_or(Self::ZERO, Self::saturating)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this is a free adoption.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.0.is_zero()
    }

    /// Line total for `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self, quantity: u32) -> Decimal {
        self.0
            .checked_mul(Decimal::from(quantity))
            .unwrap_or(Decimal::MAX)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.fract().is_zero()
            && let Some(whole) = self.0.to_u64()
        {
            return serializer.serialize_u64(whole);
        }
        match self.0.to_f64() {
            Some(float) if Decimal::try_from(float).is_ok_and(|d| d.normalize() == self.0) => {
                serializer.serialize_f64(float)
            }
            _ => serializer.collect_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(n) => Self::parse_lenient(&n.to_string()),
            serde_json::Value::String(s) => Self::parse_lenient(&s),
            _ => Self::ZERO,
        })
    }
}
