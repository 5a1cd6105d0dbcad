//! Row-to-entity parsing helpers.
//!
//! Timestamps are written with [`format_datetime`] (RFC 3339, fixed nanosecond
//! width, `Z` suffix) so they round-trip exactly and sort as text. Reading also
//! accepts `SQLite`'s `datetime('now')` format for hand-written rows.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::DatabaseError;

/// Format a timestamp for a TEXT column.
#[must_use]
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a `snake_case` serde enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a nullable score column, rejecting values outside `0..=100`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` for an out-of-range stored score.
pub fn get_opt_score(row: &libsql::Row, idx: i32) -> Result<Option<u8>, DatabaseError> {
    row.get::<Option<i64>>(idx)?
        .map(|raw| {
            u8::try_from(raw)
                .ok()
                .filter(|s| *s <= 100)
                .ok_or_else(|| DatabaseError::Query(format!("Stored score {raw} out of range")))
        })
        .transpose()
}

/// Serialize an entity for a trail payload.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_trail_data<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use lab_core::enums::AchievementKind;

    use super::*;

    #[test]
    fn datetime_roundtrips_exactly() {
        let now = Utc::now();
        assert_eq!(parse_datetime(&format_datetime(&now)).unwrap(), now);
    }

    #[test]
    fn sqlite_default_format_is_accepted() {
        let dt = parse_datetime("2026-10-15 08:30:00").unwrap();
        assert_eq!(format_datetime(&dt), "2026-10-15T08:30:00.000000000Z");
    }

    #[test]
    fn formatted_datetimes_sort_as_text() {
        let whole = "2026-10-15T08:30:00Z";
        let fraction = "2026-10-15T08:30:00.1Z";
        assert!(whole > fraction);
        let whole = format_datetime(&parse_datetime(whole).unwrap());
        let fraction = format_datetime(&parse_datetime(fraction).unwrap());
        assert!(whole < fraction);
    }

    #[test]
    fn optional_datetime_treats_empty_as_none() {
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
    }

    #[test]
    fn enum_parsing() {
        let kind: AchievementKind = parse_enum("five_labs").unwrap();
        assert_eq!(kind, AchievementKind::FiveLabs);
        assert!(parse_enum::<AchievementKind>("six_labs").is_err());
    }
}
