//! Coercions from loosely-typed JSON values into domain values
//!
//! The API is inconsistent about value types: money arrives as numbers or
//! strings, ids as numbers where they are really opaque strings, and
//! timestamps with or without a time zone.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

use crate::constants::END_OF_DAY_TIME;
use crate::errors::{Result, SiteWitError};

/// Read a decimal amount from a JSON number or numeric string.
///
/// Numbers are converted through their textual form so `19.0` stays exact.
pub fn decimal_from_value(value: &Value, field: &str) -> Result<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => {
            return Err(SiteWitError::decode(format!(
                "{field}: expected a decimal amount, got {other}"
            )))
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| SiteWitError::decode(format!("{field}: invalid decimal '{text}': {e}")))
}

/// Read an id that the API may send as a number or a string.
pub fn opaque_id_from_value(value: &Value, field: &str) -> Result<String> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.clone()),
        other => Err(SiteWitError::decode(format!("{field}: expected an id, got {other}"))),
    }
}

/// Parse the date part of an API timestamp.
///
/// Accepts `2015-05-08T11:32:03`, RFC 3339 with offset, the
/// `2015-05-08 23:59:59` form the client sends, and bare dates.
pub fn date_from_timestamp(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(stamp.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| SiteWitError::decode(format!("invalid timestamp '{raw}': {e}")))
}

/// Render a date the way the API expects expiry fields: end of that day.
pub fn end_of_day(date: NaiveDate) -> String {
    format!("{} {}", date.format("%Y-%m-%d"), END_OF_DAY_TIME)
}

/// Normalize a site identifier.
///
/// Empty means "no site". UUIDs are rendered as 32-char lowercase hex, the
/// form the API stores. Anything else is kept verbatim.
pub fn normalize_site_id(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;

    match Uuid::parse_str(raw) {
        Ok(uuid) => Some(uuid.simple().to_string()),
        Err(_) => Some(raw.to_string()),
    }
}
