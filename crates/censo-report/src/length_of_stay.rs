//! Length-of-stay calculation.
//!
//! Days are counted inclusively: a patient admitted on the report date is on
//! day 1. The admission date comes from the census as `DD/MM/YYYY`.

use chrono::NaiveDate;
use serde::Serialize;

/// Admission date format used by the census export.
pub const CENSUS_DATE_FORMAT: &str = "%d/%m/%Y";

/// Inclusive length of stay, or a marker when the admission date is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthOfStay {
    Days(i64),
    NeedsReview,
}

impl LengthOfStay {
    /// Cell text, using `needs_review` for the review marker.
    pub fn display_with<'a>(&self, needs_review: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            LengthOfStay::Days(days) => days.to_string().into(),
            LengthOfStay::NeedsReview => needs_review.into(),
        }
    }
}

/// Inclusive day count from admission to report date.
///
/// Admission dates after the report date give zero or negative counts.
pub fn length_of_stay(admission: NaiveDate, report_date: NaiveDate) -> LengthOfStay {
    LengthOfStay::Days((report_date - admission).num_days() + 1)
}

/// Length of stay from the raw admission date text.
pub fn length_of_stay_from_str(admission: &str, report_date: NaiveDate) -> LengthOfStay {
    match parse_census_date(admission) {
        Some(date) => length_of_stay(date, report_date),
        None => LengthOfStay::NeedsReview,
    }
}

/// Parse a `DD/MM/YYYY` date; impossible calendar dates return `None`.
pub fn parse_census_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), CENSUS_DATE_FORMAT).ok()
}
