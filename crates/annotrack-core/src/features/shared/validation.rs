//! Shared validation utilities
//!
//! Field-level validators used by every command before anything reaches the
//! store. Each validator returns the normalized value on success, so commands
//! can build their insert payload straight from the results.
//!
//! # Examples
//!
//! ```rust,ignore
//! use annotrack_core::features::shared::validation::{
//!     normalize_optional_text, validate_accuracy, validate_required_text,
//! };
//!
//! let name = validate_required_text("  baseline  ", "name", 255)?;        // "baseline"
//! let notes = normalize_optional_text(Some("   "), "description", None)?; // None
//! let accuracy = validate_accuracy(0.93)?;
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::BoundingBox;

/// Maximum length of an experiment name
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of an image file path
pub const MAX_FILE_PATH_LENGTH: usize = 500;

/// Maximum length of an image's original file name
pub const MAX_ORIGINAL_NAME_LENGTH: usize = 255;

/// Errors for free-text fields
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max_length: usize,
        actual: usize,
    },
}

/// Errors for dates and timestamps
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateValidationError {
    #[error("{field} cannot be in the future ({value})")]
    InFuture { field: &'static str, value: String },

    #[error("'{0}' is not a valid date or timestamp")]
    Unparseable(String),
}

/// Errors for the run accuracy score
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AccuracyValidationError {
    #[error("accuracy must be a number, got '{0}'")]
    NotANumber(String),

    #[error("accuracy must be a finite number")]
    NotFinite,

    #[error("accuracy must be within [0.0, 1.0], got {0}")]
    OutOfRange(f64),
}

/// Errors for the run flagged marker
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlaggedValidationError {
    #[error("flagged must be a boolean (true or false), got '{0}'")]
    NotBoolean(String),
}

/// Errors for bounding-box coordinates
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordinatesValidationError {
    #[error("coordinates must contain exactly 4 values (x1, y1, x2, y2), got {0}")]
    WrongLength(usize),

    #[error("coordinate #{index} must be an integer, got {value}")]
    NotIntegral { index: usize, value: f64 },

    #[error("coordinate #{index} must be non-negative, got {value}")]
    Negative { index: usize, value: i64 },

    #[error("coordinates must satisfy x2 > x1 and y2 > y1, got [{x1}, {y1}, {x2}, {y2}]")]
    NotOrdered { x1: i64, y1: i64, x2: i64, y2: i64 },

    #[error("'{0}' is not a number")]
    Unparseable(String),
}

/// Trim a required text field and enforce its maximum length
pub fn validate_required_text(
    value: &str,
    field: &'static str,
    max_length: usize,
) -> Result<String, TextValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextValidationError::Required { field });
    }
    check_length(trimmed, field, Some(max_length))?;
    Ok(trimmed.to_string())
}

/// Trim an optional text field; empty-after-trim becomes `None`
pub fn normalize_optional_text(
    value: Option<&str>,
    field: &'static str,
    max_length: Option<usize>,
) -> Result<Option<String>, TextValidationError> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    check_length(trimmed, field, max_length)?;
    Ok(Some(trimmed.to_string()))
}

fn check_length(
    value: &str,
    field: &'static str,
    max_length: Option<usize>,
) -> Result<(), TextValidationError> {
    let Some(max_length) = max_length else {
        return Ok(());
    };
    let actual = value.chars().count();
    if actual > max_length {
        return Err(TextValidationError::TooLong {
            field,
            max_length,
            actual,
        });
    }
    Ok(())
}

/// Reject calendar dates after `today`
pub fn validate_past_date(
    date: NaiveDate,
    today: NaiveDate,
    field: &'static str,
) -> Result<NaiveDate, DateValidationError> {
    if date > today {
        return Err(DateValidationError::InFuture {
            field,
            value: date.to_string(),
        });
    }
    Ok(date)
}

/// Reject timestamps after `now`
pub fn validate_past_timestamp(
    timestamp: DateTime<Utc>,
    now: DateTime<Utc>,
    field: &'static str,
) -> Result<DateTime<Utc>, DateValidationError> {
    if timestamp > now {
        return Err(DateValidationError::InFuture {
            field,
            value: timestamp.to_rfc3339(),
        });
    }
    Ok(timestamp)
}

/// Parse a timestamp and normalize it to UTC
///
/// Accepts RFC 3339 (any offset), or a naive `YYYY-MM-DD[ T]HH:MM[:SS]`
/// timestamp which is taken to be UTC already, or a bare date (midnight UTC).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, DateValidationError> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateValidationError::Unparseable(input.to_string()))
}

/// Parse a calendar date (`YYYY-MM-DD`)
pub fn parse_date(input: &str) -> Result<NaiveDate, DateValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| DateValidationError::Unparseable(input.to_string()))
}

/// Check that an accuracy score lies in `[0.0, 1.0]`, bounds included
pub fn validate_accuracy(value: f64) -> Result<f64, AccuracyValidationError> {
    if !value.is_finite() {
        return Err(AccuracyValidationError::NotFinite);
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(AccuracyValidationError::OutOfRange(value));
    }
    Ok(value)
}

/// Coerce text to a float, then validate it as an accuracy score
pub fn parse_accuracy(input: &str) -> Result<f64, AccuracyValidationError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| AccuracyValidationError::NotANumber(input.to_string()))?;
    validate_accuracy(value)
}

/// Parse a strict boolean: only `true` or `false`
pub fn parse_flagged(input: &str) -> Result<bool, FlaggedValidationError> {
    match input.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(FlaggedValidationError::NotBoolean(other.to_string())),
    }
}

/// A raw coordinate as it arrives from a form or JSON payload
///
/// JSON integers decode to `Integer`, anything with a fractional part or an
/// exponent decodes to `Float`. Booleans and strings fail to decode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Integer(i64),
    Float(f64),
}

impl CoordinateValue {
    /// Integer value, if this coordinate is one or is an integral float
    fn to_integer(self, index: usize) -> Result<i64, CoordinatesValidationError> {
        match self {
            CoordinateValue::Integer(value) => Ok(value),
            CoordinateValue::Float(value) => {
                // i64::MAX is not representable as f64; stay strictly below 2^63.
                let in_range = value.abs() < 9.223_372_036_854_775e18;
                if value.is_finite() && value.fract() == 0.0 && in_range {
                    Ok(value as i64)
                } else {
                    Err(CoordinatesValidationError::NotIntegral { index, value })
                }
            },
        }
    }
}

impl From<i64> for CoordinateValue {
    fn from(value: i64) -> Self {
        CoordinateValue::Integer(value)
    }
}

impl From<f64> for CoordinateValue {
    fn from(value: f64) -> Self {
        CoordinateValue::Float(value)
    }
}

impl FromStr for CoordinateValue {
    type Err = CoordinatesValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i64>() {
            return Ok(CoordinateValue::Integer(value));
        }
        s.parse::<f64>()
            .map(CoordinateValue::Float)
            .map_err(|_| CoordinatesValidationError::Unparseable(s.to_string()))
    }
}

impl fmt::Display for CoordinateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateValue::Integer(value) => write!(f, "{value}"),
            CoordinateValue::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Validate `[x1, y1, x2, y2]` into a bounding box
///
/// # Rules
/// - exactly four values
/// - each value is an integer or an integral float
/// - all values are non-negative
/// - `x2 > x1` and `y2 > y1`
pub fn validate_coordinates(
    values: &[CoordinateValue],
) -> Result<BoundingBox, CoordinatesValidationError> {
    if values.len() != 4 {
        return Err(CoordinatesValidationError::WrongLength(values.len()));
    }

    let mut coords = [0i64; 4];
    for (index, value) in values.iter().enumerate() {
        coords[index] = value.to_integer(index)?;
    }

    BoundingBox::try_from(coords)
}

/// Check the geometric rules on already-integral coordinates
pub(crate) fn check_box(coords: [i64; 4]) -> Result<(), CoordinatesValidationError> {
    if let Some((index, &value)) = coords.iter().enumerate().find(|(_, v)| **v < 0) {
        return Err(CoordinatesValidationError::Negative { index, value });
    }
    let [x1, y1, x2, y2] = coords;
    if x2 <= x1 || y2 <= y1 {
        return Err(CoordinatesValidationError::NotOrdered { x1, y1, x2, y2 });
    }
    Ok(())
}

/// Parse a comma-separated `x1,y1,x2,y2` list into raw coordinates
pub fn parse_coordinate_list(input: &str) -> Result<Vec<CoordinateValue>, CoordinatesValidationError> {
    input
        .split(',')
        .map(str::parse::<CoordinateValue>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn ints(values: [i64; 4]) -> Vec<CoordinateValue> {
        values.iter().copied().map(CoordinateValue::from).collect()
    }

    #[test]
    fn test_required_text_is_trimmed() {
        assert_eq!(
            validate_required_text("  baseline  ", "name", 255).unwrap(),
            "baseline"
        );
    }

    #[test]
    fn test_required_text_rejects_whitespace() {
        assert_eq!(
            validate_required_text(" \t\n", "name", 255),
            Err(TextValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn test_required_text_length_counts_after_trim() {
        let padded = format!("  {}  ", "a".repeat(255));
        assert!(validate_required_text(&padded, "name", 255).is_ok());
        assert!(matches!(
            validate_required_text(&"a".repeat(256), "name", 255),
            Err(TextValidationError::TooLong { actual: 256, .. })
        ));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let cyrillic = "эксперимент".repeat(20); // 220 chars, 440 bytes
        assert!(validate_required_text(&cyrillic, "name", 255).is_ok());
    }

    #[test]
    fn test_optional_text_empty_becomes_none() {
        assert_eq!(normalize_optional_text(Some("   "), "description", None), Ok(None));
        assert_eq!(normalize_optional_text(None, "description", None), Ok(None));
        assert_eq!(
            normalize_optional_text(Some(" notes "), "description", None),
            Ok(Some("notes".to_string()))
        );
    }

    #[test]
    fn test_optional_text_too_long() {
        let long = "x".repeat(256);
        assert!(normalize_optional_text(Some(&long), "original_name", Some(255)).is_err());
    }

    #[test]
    fn test_past_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(validate_past_date(today, today, "created_date").is_ok());
        assert!(matches!(
            validate_past_date(today.succ_opt().unwrap(), today, "created_date"),
            Err(DateValidationError::InFuture { .. })
        ));
    }

    #[test]
    fn test_past_timestamp() {
        let now = Utc::now();
        assert!(validate_past_timestamp(now, now, "run_date").is_ok());
        assert!(validate_past_timestamp(now - Duration::hours(1), now, "run_date").is_ok());
        assert!(validate_past_timestamp(now + Duration::seconds(1), now, "run_date").is_err());
    }

    #[test]
    fn test_parse_timestamp_normalizes_offset_to_utc() {
        let ts = parse_timestamp("2024-01-15T12:00:00+03:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T09:00:00+00:00");
    }

    #[test]
    fn test_parse_timestamp_naive_is_utc() {
        let ts = parse_timestamp("2024-01-15 12:30:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T12:30:00+00:00");
        let day = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_accuracy_bounds_are_inclusive() {
        assert_eq!(validate_accuracy(0.0), Ok(0.0));
        assert_eq!(validate_accuracy(1.0), Ok(1.0));
        assert_eq!(
            validate_accuracy(1.5),
            Err(AccuracyValidationError::OutOfRange(1.5))
        );
        assert!(validate_accuracy(-0.01).is_err());
        assert_eq!(validate_accuracy(f64::NAN), Err(AccuracyValidationError::NotFinite));
    }

    #[test]
    fn test_parse_accuracy_coerces_text() {
        assert_eq!(parse_accuracy(" 0.75 "), Ok(0.75));
        assert_eq!(parse_accuracy("1"), Ok(1.0));
        assert!(matches!(
            parse_accuracy("high"),
            Err(AccuracyValidationError::NotANumber(_))
        ));
    }

    #[test]
    fn test_flagged_is_strict() {
        assert_eq!(parse_flagged("true"), Ok(true));
        assert_eq!(parse_flagged("false"), Ok(false));
        for input in ["1", "yes", "True", ""] {
            assert!(parse_flagged(input).is_err(), "'{}' should be rejected", input);
        }
    }

    #[test]
    fn test_coordinates_valid() {
        let bbox = validate_coordinates(&ints([10, 10, 20, 20])).unwrap();
        assert_eq!(<[i64; 4]>::from(bbox), [10, 10, 20, 20]);
    }

    #[test]
    fn test_coordinates_reversed_x_rejected() {
        assert!(matches!(
            validate_coordinates(&ints([10, 10, 5, 20])),
            Err(CoordinatesValidationError::NotOrdered { .. })
        ));
    }

    #[test]
    fn test_coordinates_degenerate_box_rejected() {
        assert!(validate_coordinates(&ints([10, 10, 10, 20])).is_err());
        assert!(validate_coordinates(&ints([10, 10, 20, 10])).is_err());
    }

    #[test]
    fn test_coordinates_negative_rejected() {
        assert_eq!(
            validate_coordinates(&ints([-1, 0, 5, 5])),
            Err(CoordinatesValidationError::Negative { index: 0, value: -1 })
        );
    }

    #[test]
    fn test_coordinates_wrong_length() {
        assert_eq!(
            validate_coordinates(&ints([1, 2, 3, 4])[..3]),
            Err(CoordinatesValidationError::WrongLength(3))
        );
        let five: Vec<CoordinateValue> = (0i64..5).map(CoordinateValue::from).collect();
        assert!(validate_coordinates(&five).is_err());
    }

    #[test]
    fn test_coordinates_integral_floats_accepted() {
        let values = vec![
            CoordinateValue::Float(10.0),
            CoordinateValue::Integer(10),
            CoordinateValue::Float(20.0),
            CoordinateValue::Float(25.0),
        ];
        let bbox = validate_coordinates(&values).unwrap();
        assert_eq!(<[i64; 4]>::from(bbox), [10, 10, 20, 25]);
    }

    #[test]
    fn test_coordinates_fractional_float_rejected() {
        let values = vec![
            CoordinateValue::Float(10.5),
            CoordinateValue::Integer(10),
            CoordinateValue::Integer(20),
            CoordinateValue::Integer(20),
        ];
        assert!(matches!(
            validate_coordinates(&values),
            Err(CoordinatesValidationError::NotIntegral { index: 0, .. })
        ));
    }

    #[test]
    fn test_coordinate_json_decoding() {
        let values: Vec<CoordinateValue> = serde_json::from_str("[1, 2.0, 3.5, 4]").unwrap();
        assert_eq!(
            values,
            vec![
                CoordinateValue::Integer(1),
                CoordinateValue::Float(2.0),
                CoordinateValue::Float(3.5),
                CoordinateValue::Integer(4),
            ]
        );
        assert!(serde_json::from_str::<Vec<CoordinateValue>>("[true, 1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Vec<CoordinateValue>>(r#"["1", 1, 2, 3]"#).is_err());
    }

    #[test]
    fn test_parse_coordinate_list() {
        let values = parse_coordinate_list("10, 10.0, 20,20").unwrap();
        assert!(validate_coordinates(&values).is_ok());
        assert!(parse_coordinate_list("10,ten,20,20").is_err());
    }

    proptest! {
        #[test]
        fn test_ordered_boxes_always_validate(
            x1 in 0i64..10_000,
            y1 in 0i64..10_000,
            w in 1i64..10_000,
            h in 1i64..10_000,
        ) {
            let bbox = validate_coordinates(&ints([x1, y1, x1 + w, y1 + h])).unwrap();
            prop_assert_eq!(bbox.width(), w);
            prop_assert_eq!(bbox.height(), h);
        }

        #[test]
        fn test_swapped_corners_never_validate(
            x1 in 1i64..10_000,
            y1 in 1i64..10_000,
            dx in 0i64..1_000,
        ) {
            let x2 = (x1 - dx).max(0);
            prop_assert!(validate_coordinates(&ints([x1, y1, x2, y1 + 1])).is_err());
        }
    }
}
