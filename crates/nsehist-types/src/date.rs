//! DD-MM-YYYY date helpers.
//!
//! Every date a user types, every date in an exported file and every date
//! NSE prints in its index snapshot uses the day-first `DD-MM-YYYY` layout.

use chrono::NaiveDate;

use crate::DateParseError;

/// `chrono` format string for `DD-MM-YYYY`.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// `chrono` format string for the compact `YYYYMMDD` form used in file names.
pub const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Parses a `DD-MM-YYYY` date, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns an error if the input is not a valid `DD-MM-YYYY` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| DateParseError(trimmed.to_string()))
}

/// Renders a date as `DD-MM-YYYY`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Renders a date as `YYYYMMDD`.
#[must_use]
pub fn format_compact(date: NaiveDate) -> String {
    date.format(COMPACT_DATE_FORMAT).to_string()
}
