//! Serde helper functions for form and query string deserialization.
//!
//! HTML forms submit every field as a string and send empty strings for blank
//! inputs; these helpers treat blank values as None for optional fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::news::NewsType;

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    non_blank(deserializer)
}

/// Deserialize an optional integer id submitted as text, treating empty strings as None.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_blank(deserializer)? {
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Deserialize an optional NaiveDate, treating empty strings as None.
/// Expects format: YYYY-MM-DD
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_blank(deserializer)? {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Deserialize an optional UTC timestamp from an HTML `datetime-local` input,
/// treating empty strings as None.
/// Accepts formats: YYYY-MM-DDTHH:MM, YYYY-MM-DDTHH:MM:SS or RFC 3339
pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(s) = non_blank(deserializer)? else {
        return Ok(None);
    };
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}

/// Deserialize an optional news type code (`NW` / `AR`), treating empty strings as None.
pub fn deserialize_optional_news_type<'de, D>(
    deserializer: D,
) -> Result<Option<NewsType>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_blank(deserializer)? {
        Some(s) => NewsType::from_code(s.trim())
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown news type: {s}"))),
        None => Ok(None),
    }
}
