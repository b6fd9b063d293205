//! Order identifiers.
//!
//! Orders are identified by opaque strings. The backend issues its own ids;
//! orders placed on this client before the backend has seen them carry a
//! generated id of the form `order-real-<unix-millis>-<suffix>`.

use core::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix for client-generated order ids.
pub const GENERATED_PREFIX: &str = "order-real-";

/// Length of the random base36 suffix of a generated id.
const SUFFIX_LENGTH: usize = 9;

/// Errors that can occur when parsing an [`OrderId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderIdError {
    /// The input is empty or only whitespace.
    #[error("order id cannot be empty")]
    Empty,
}

/// Identifier of an order, unique within a reconciled order list.
///
/// Deserializes from either a JSON string or a JSON number, since some
/// backends hand out numeric ids. Numbers are kept as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Parse an `OrderId`. The text is kept exactly as given, so ids that
    /// differ only in whitespace stay distinct.
    ///
    /// # Errors
    ///
    /// Returns [`OrderIdError::Empty`] if `s` is empty or only whitespace.
    pub fn parse(s: &str) -> Result<Self, OrderIdError> {
        if s.trim().is_empty() {
            return Err(OrderIdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Generate a client-side id stamped with `at`.
    #[must_use]
    pub fn generate_at(at: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LENGTH)
            .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
            .collect();
        Self(format!(
            "{GENERATED_PREFIX}{}-{suffix}",
            at.timestamp_millis()
        ))
    }

    /// Whether this id was generated on the client rather than by the backend.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.0.starts_with(GENERATED_PREFIX)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `OrderId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for OrderId {
    type Err = OrderIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
