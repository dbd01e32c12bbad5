//! Form drivers
//!
//! Each form collects raw user input (strings, the way input widgets hand it
//! over), validates it client-side, translates it into a persistence row, and
//! issues exactly one insert or update against the backend. Forms hold no
//! state beyond the edit session; pages own everything persistent.

pub mod edit_schedule;
pub mod invoice;
pub mod schedule;
pub mod weekly;

pub use edit_schedule::EditScheduleForm;
pub use invoice::InvoiceForm;
pub use schedule::{EmployeeChoice, ScheduleForm};
pub use weekly::{DayShift, EmployeeWeek, WEEKDAYS, WeeklyScheduleForm};

use crate::core::ValidationError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9](?::[0-5][0-9])?$")
        .unwrap_or_else(|e| panic!("invalid time regex: {e}"))
});

/// Parse a required `YYYY-MM-DD` input field
pub(crate) fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Check a required free-typed time-of-day field (`HH:MM`, seconds allowed)
pub(crate) fn check_time(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    if TIME_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_parsing() {
        assert!(parse_date("date", "2024-06-03").is_ok());
        assert_eq!(
            parse_date("date", ""),
            Err(ValidationError::MissingField { field: "date" })
        );
        assert!(matches!(
            parse_date("date", "06/03/2024"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn time_checking() {
        assert!(check_time("start time", "09:00").is_ok());
        assert!(check_time("start time", "23:59:59").is_ok());
        assert!(check_time("start time", "24:00").is_err());
        assert!(check_time("start time", "9am").is_err());
        assert_eq!(
            check_time("end time", " "),
            Err(ValidationError::MissingField { field: "end time" })
        );
    }
}
