//! Serde helper functions for request payloads.
//!
//! Update payloads use "truthy override" semantics: a field that is absent,
//! `null`, `false`, `0` or the empty string means "keep the stored value".
//! These helpers collapse every falsy JSON value to `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses a timestamp given as RFC 3339, or as a naive `YYYY-MM-DDTHH:MM[:SS]`
/// or `YYYY-MM-DD` value interpreted as UTC.
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Deserialize an optional string, treating falsy values as None.
pub fn deserialize_truthy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) if is_falsy(&v) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

/// Deserialize an optional timestamp, treating falsy values as None.
pub fn deserialize_truthy_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) if is_falsy(&v) => Ok(None),
        Some(Value::String(s)) => parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date and time: {s}"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a date and time string, found {other}"
        ))),
    }
}

/// Deserialize a required timestamp using [`parse_datetime`].
pub fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_datetime(&s)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date and time: {s}")))
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(default, deserialize_with = "deserialize_truthy_string")]
        string_field: Option<String>,
        #[serde(default, deserialize_with = "deserialize_truthy_datetime")]
        datetime_field: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        optional_field: Option<String>,
    }

    fn parse(json: &str) -> TestStruct {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        assert_eq!(parse_datetime("2024-01-01T10:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-01T10:00:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("2024-01-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-01 10:00"), Some(expected));
        assert_eq!(
            parse_datetime("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_datetime("yesterday"), None);
    }

    #[test]
    fn test_truthy_string_falsy_values() {
        for json in [
            r#"{}"#,
            r#"{"string_field": null}"#,
            r#"{"string_field": ""}"#,
            r#"{"string_field": 0}"#,
            r#"{"string_field": false}"#,
        ] {
            assert_eq!(parse(json).string_field, None, "{json}");
        }
    }

    #[test]
    fn test_truthy_string_keeps_whitespace_and_zero_string() {
        assert_eq!(
            parse(r#"{"string_field": "0"}"#).string_field.as_deref(),
            Some("0")
        );
        assert_eq!(
            parse(r#"{"string_field": " "}"#).string_field.as_deref(),
            Some(" ")
        );
    }

    #[test]
    fn test_truthy_string_rejects_truthy_non_strings() {
        let result: Result<TestStruct, _> = serde_json::from_str(r#"{"string_field": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_truthy_datetime() {
        assert_eq!(parse(r#"{"datetime_field": ""}"#).datetime_field, None);
        assert_eq!(parse(r#"{"datetime_field": 0}"#).datetime_field, None);
        assert_eq!(
            parse(r#"{"datetime_field": "2024-03-05T08:30"}"#).datetime_field,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 8, 30, 0).unwrap())
        );

        let bad: Result<TestStruct, _> =
            serde_json::from_str(r#"{"datetime_field": "not a date"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_optional_string_whitespace() {
        assert_eq!(parse(r#"{"optional_field": "   "}"#).optional_field, None);
        assert_eq!(
            parse(r#"{"optional_field": "hi"}"#).optional_field.as_deref(),
            Some("hi")
        );
    }
}
