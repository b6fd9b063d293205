//! Forgiving field deserializers for order payloads.
//!
//! Orders arrive from browser storage written by older clients and from a
//! backend whose field types drift. A bad field degrades to its default
//! instead of rejecting the whole record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::status::OrderOrigin;

/// Text field: strings pass through, numbers and booleans are stringified,
/// anything else is empty.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

pub const fn one() -> u32 {
    1
}

/// Positive quantity; zero, negative, fractional or missing becomes 1.
pub fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(parsed
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q > 0)
        .unwrap_or_else(one))
}

/// RFC 3339 timestamp, bare `YYYY-MM-DD` date (midnight UTC) or Unix
/// milliseconds; anything unparseable is treated as absent.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => parse_timestamp(&s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

/// Provenance tag; non-string values are treated as absent.
pub fn origin<'de, D>(deserializer: D) -> Result<Option<OrderOrigin>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(
            serde_json::from_value(Value::String(s.to_ascii_lowercase()))
                .unwrap_or(OrderOrigin::Unknown),
        ),
        _ => None,
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}
