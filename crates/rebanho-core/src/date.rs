//! Calendar-date parsing and formatting at the form boundary.
//!
//! The UI submits dates either in canonical ISO (`YYYY-MM-DD`, native date
//! pickers) or in the Brazilian display form (`DD/MM/YYYY`). Everything is
//! normalized to `YYYY-MM-DD` before it reaches a store.

use chrono::NaiveDate;

use crate::error::ValidationError;

const CANONICAL_FMT: &str = "%Y-%m-%d";
const DISPLAY_FMT: &str = "%d/%m/%Y";

/// Parse a raw date string in either accepted form.
/// Parsing the canonical output again is idempotent.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(ValidationError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(s, CANONICAL_FMT)
        .or_else(|_| NaiveDate::parse_from_str(s, DISPLAY_FMT))
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

/// Render the canonical `YYYY-MM-DD` form used for persistence.
pub fn canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FMT).to_string()
}

/// Render the `DD/MM/YYYY` form shown to users.
pub fn display(date: NaiveDate) -> String {
    date.format(DISPLAY_FMT).to_string()
}

/// Whole days of validity between application and expiry.
///
/// Absent expiry means absent validity, never zero. An expiry before the
/// application date clamps to zero rather than failing; this mirrors the
/// expiry normalization legacy data already went through and is kept as-is.
pub fn validity_days(application: NaiveDate, expiration: Option<NaiveDate>) -> Option<i64> {
    expiration.map(|exp| (exp - application).num_days().max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_canonical_form() {
        assert_eq!(parse_date("2024-03-01").unwrap(), d(2024, 3, 1));
    }

    #[test]
    fn parses_display_form() {
        assert_eq!(parse_date("01/03/2024").unwrap(), d(2024, 3, 1));
        assert_eq!(parse_date(" 25/12/2023 ").unwrap(), d(2023, 12, 25));
    }

    #[test]
    fn normalization_is_idempotent() {
        let first = parse_date("10/01/2024").unwrap();
        let second = parse_date(&canonical(first)).unwrap();
        assert_eq!(first, second);
        assert_eq!(canonical(second), "2024-01-10");
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(parse_date("").is_err());
        assert!(parse_date("   ").is_err());
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("32/01/2024").is_err());
    }

    #[test]
    fn display_round_trip() {
        let date = d(2024, 7, 9);
        assert_eq!(display(date), "09/07/2024");
        assert_eq!(parse_date(&display(date)).unwrap(), date);
    }

    #[test]
    fn validity_uses_exact_day_count() {
        // 2024 is a leap year, so a one-year span crosses 366 days.
        assert_eq!(
            validity_days(d(2024, 1, 10), Some(d(2025, 1, 10))),
            Some(366)
        );
        assert_eq!(
            validity_days(d(2023, 1, 10), Some(d(2024, 1, 10))),
            Some(365)
        );
    }

    #[test]
    fn validity_clamps_to_zero() {
        assert_eq!(validity_days(d(2024, 6, 1), Some(d(2024, 5, 1))), Some(0));
        assert_eq!(validity_days(d(2024, 6, 1), Some(d(2024, 6, 1))), Some(0));
    }

    #[test]
    fn absent_expiry_is_unset_not_zero() {
        assert_eq!(validity_days(d(2024, 6, 1), None), None);
    }
}
