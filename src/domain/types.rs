//! Loosely-typed value objects mirroring what the CRM provider sends.
//!
//! The provider is inconsistent about JSON types: identifiers arrive as
//! numbers or strings, amounts as decimal strings, numbers or `null`. These
//! wrappers accept every shape, serialize back in the shape they were read,
//! and expose the normalized view the aggregation layer relies on.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier issued by the CRM provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Canonical string form used as a lookup key.
    pub fn key(&self) -> String {
        match self {
            RecordId::Number(value) => value.to_string(),
            RecordId::Text(value) => value.trim().to_string(),
        }
    }

    /// Returns `false` for values the provider uses as "not set" (`0`, `""`).
    pub fn is_present(&self) -> bool {
        match self {
            RecordId::Number(value) => *value != 0,
            RecordId::Text(value) => !value.trim().is_empty(),
        }
    }

    /// Loose comparison against a raw filter value.
    ///
    /// Integers compare numerically (`"01"` matches `1`), anything else
    /// compares as trimmed text.
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        let own = self.key();
        match (own.parse::<i64>(), raw.parse::<i64>()) {
            (Ok(left), Ok(right)) => left == right,
            _ => own == raw,
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.key())
    }
}

impl Eq for RecordId {}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId::Number(i64::from(value))
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

/// Monetary amount as sent by the provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
    /// Any other JSON shape; counts as zero.
    Other(serde_json::Value),
}

impl Amount {
    /// Parsed value; never negative, zero when the amount is unusable.
    pub fn value(&self) -> f64 {
        let parsed = match self {
            Amount::Number(value) => *value,
            Amount::Text(raw) => parse_decimal_prefix(raw).unwrap_or(0.0),
            Amount::Other(_) => 0.0,
        };
        if parsed.is_finite() && parsed > 0.0 {
            parsed
        } else {
            0.0
        }
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

/// Parses the longest leading decimal number in `raw`, ignoring leading
/// whitespace. `"12.5 USD"` yields `12.5`, `"USD 12"` yields `None`.
pub fn parse_decimal_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        if fraction_end > fraction_start || has_digits {
            has_digits |= fraction_end > fraction_start;
            end = fraction_end;
        }
    }

    if !has_digits {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+') | Some(b'-')) {
            exponent_end += 1;
        }
        let exponent_digits = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits {
            end = exponent_end;
        }
    }

    trimmed[..end].trim_end_matches('.').parse::<f64>().ok()
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
