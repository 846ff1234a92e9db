// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Day-granular (de)serialization for due dates.
//!
//! The client always writes `YYYY-MM-DD`. The remote side may answer with
//! either a plain date or a full timestamp (`2025-07-04T00:00:00.000Z`); a
//! timestamp is folded onto the local calendar day it falls on.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a due date from any of the accepted wire shapes.
pub fn parse(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    // Timestamps without an offset are already local.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|stamp| stamp.date())
}

pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(date) => serializer.serialize_str(&date.format(DATE_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid due date '{raw}'"))),
    }
}

/// Serializer for patch fields, where `Some(None)` clears the date.
pub fn serialize_patch<S>(
    date: &Option<Option<NaiveDate>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serialize(&(*date).flatten(), serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse("2025-07-04"), NaiveDate::from_ymd_opt(2025, 7, 4));
    }

    #[test]
    fn test_parse_timestamp_uses_local_day() {
        let expected = Utc
            .with_ymd_and_hms(2025, 7, 4, 12, 0, 0)
            .unwrap()
            .with_timezone(&Local)
            .date_naive();
        assert_eq!(parse("2025-07-04T12:00:00.000Z"), Some(expected));
    }

    #[test]
    fn test_parse_naive_timestamp() {
        assert_eq!(
            parse("2025-07-04T08:30:00"),
            NaiveDate::from_ymd_opt(2025, 7, 4)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse("next tuesday"), None);
        assert_eq!(parse(""), None);
    }
}
