//! Error types for nsehist.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for nsehist operations.
pub type Result<T> = std::result::Result<T, NsehistError>;

/// Top-level errors that abort a download run.
///
/// Per-day misses never surface here; they are counted by the fetch loop.
#[derive(Error, Debug)]
pub enum NsehistError {
    /// Invalid user input.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// The snapshot source failed outside the per-day boundary.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The daily table could not be resampled.
    #[error("Resample error: {0}")]
    Resample(String),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },
}

/// Error returned when a string is not a `DD-MM-YYYY` date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date '{0}', expected DD-MM-YYYY (e.g. 01-01-2021)")]
pub struct DateParseError(pub String);

/// Validation errors raised before any data is requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The symbol or index name was blank.
    #[error("Please enter a symbol/index name")]
    EmptySymbol,

    /// The end date does not come after the start date.
    #[error("'To Date' must be after 'From Date'")]
    EndNotAfterStart {
        /// The start date.
        from: NaiveDate,
        /// The end date.
        to: NaiveDate,
    },

    /// A date lies in the future.
    #[error("{0} is in the future")]
    FutureDate(NaiveDate),

    /// A date could not be parsed.
    #[error(transparent)]
    Date(#[from] DateParseError),
}
