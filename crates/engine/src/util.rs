//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same rules before touching the
//! database.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim a required text field, rejecting blank values.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank values become `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Case-insensitive comparison key for catalog names.
///
/// Folding happens here rather than in SQL: SQLite's `lower()` only maps
/// ASCII letters.
pub(crate) fn fold_case(value: &str) -> String {
    value.trim().to_lowercase()
}

pub(crate) fn require_non_negative(amount: Money, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(())
}

pub(crate) fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ResultEngine<()> {
    if end < start {
        return Err(EngineError::InvalidDate(
            "end date must not be before start date".to_string(),
        ));
    }
    Ok(())
}

/// Parse an `HH:MM` wall-clock time.
pub fn parse_time(value: &str) -> ResultEngine<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| EngineError::InvalidDate(format!("invalid time (expected HH:MM): {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_case_handles_non_ascii() {
        assert_eq!(fold_case(" ZÜRICH "), fold_case("Zürich"));
        assert_eq!(fold_case("São Paulo"), "são paulo");
    }

    #[test]
    fn required_text_is_trimmed() {
        assert_eq!(normalize_required_text("  Food ", "name").unwrap(), "Food");
        assert!(matches!(
            normalize_required_text("   ", "name"),
            Err(EngineError::InvalidName(_))
        ));
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some(" ")), None);
        assert_eq!(normalize_optional_text(Some(" x ")), Some("x".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn time_parsing() {
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("nine").is_err());
    }

    #[test]
    fn date_range_rejects_inverted() {
        let a = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(validate_date_range(b, a).is_ok());
        assert!(validate_date_range(a, a).is_ok());
        assert!(matches!(
            validate_date_range(a, b),
            Err(EngineError::InvalidDate(_))
        ));
    }
}
