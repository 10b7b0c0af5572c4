//! Date range and calendar-day iteration.

use chrono::{NaiveDate, TimeDelta};

use crate::{DateRangeError, date::format_date};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns an iterator over every calendar day in the range, ascending.
    #[must_use]
    pub fn days(&self) -> DayIterator {
        DayIterator::new(self.start, self.end)
    }

    /// Returns the total number of calendar days in the range, both ends included.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns the number of days between start and end, excluding the start day.
    ///
    /// This is the span a user sees when picking two dates: a Monday to the
    /// following Monday spans 7 days.
    #[must_use]
    pub fn span_days(&self) -> usize {
        (self.end - self.start).num_days() as usize
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", format_date(self.start), format_date(self.end))
    }
}

/// Iterator over all calendar days in a date range.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: NaiveDate,
    end: NaiveDate,
    done: bool,
}

impl DayIterator {
    const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            current: start,
            end,
            done: false,
        }
    }
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current > self.end {
            return None;
        }

        let result = self.current;
        // NaiveDate::MAX has no successor
        match self.current.checked_add_signed(TimeDelta::days(1)) {
            Some(next) => self.current = next,
            None => self.done = true,
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done || self.current > self.end {
            return (0, Some(0));
        }
        let days = (self.end - self.current).num_days() as usize + 1;
        (days, Some(days))
    }
}

impl ExactSizeIterator for DayIterator {}
