//! Calendar buckets for resampling.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use nsehist_types::Timeframe;

/// A calendar bucket size coarser than one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Saturday through Friday, keyed by the Friday.
    Week,
    /// A calendar month, keyed by its last day.
    Month,
}

impl Period {
    /// Returns the bucket size for a timeframe, or `None` for daily output.
    #[must_use]
    pub const fn from_timeframe(timeframe: Timeframe) -> Option<Self> {
        match timeframe {
            Timeframe::Daily => None,
            Timeframe::Weekly => Some(Self::Week),
            Timeframe::Monthly => Some(Self::Month),
        }
    }

    /// Returns the last calendar day of the bucket containing `date`.
    ///
    /// The bucket end doubles as the bucket key and as the date printed on
    /// the aggregated record.
    #[must_use]
    pub fn bucket_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Week => week_ending_friday(date),
            Self::Month => month_end(date),
        }
    }
}

/// Returns the Friday on or after `date`.
fn week_ending_friday(date: NaiveDate) -> NaiveDate {
    let friday = Weekday::Fri.num_days_from_monday();
    let offset = (friday + 7 - date.weekday().num_days_from_monday()) % 7;
    date.checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Returns the last day of the month containing `date`.
fn month_end(date: NaiveDate) -> NaiveDate {
    let next_month_start = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month_start
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_ends_on_friday() {
        // Mon 03-02-2025 .. Fri 07-02-2025 share a bucket
        for day in 3..=7 {
            assert_eq!(Period::Week.bucket_end(date(2025, 2, day)), date(2025, 2, 7));
        }
    }

    #[test]
    fn test_weekend_rolls_into_next_week() {
        assert_eq!(Period::Week.bucket_end(date(2025, 2, 8)), date(2025, 2, 14)); // Saturday
        assert_eq!(Period::Week.bucket_end(date(2025, 2, 9)), date(2025, 2, 14)); // Sunday
    }

    #[test]
    fn test_week_crossing_year() {
        // Mon 30-12-2024 belongs to the week ending Fri 03-01-2025
        assert_eq!(Period::Week.bucket_end(date(2024, 12, 30)), date(2025, 1, 3));
    }

    #[test]
    fn test_month_end() {
        assert_eq!(Period::Month.bucket_end(date(2025, 1, 15)), date(2025, 1, 31));
        assert_eq!(Period::Month.bucket_end(date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(Period::Month.bucket_end(date(2025, 2, 28)), date(2025, 2, 28));
        assert_eq!(Period::Month.bucket_end(date(2025, 12, 1)), date(2025, 12, 31));
    }

    #[test]
    fn test_from_timeframe() {
        assert_eq!(Period::from_timeframe(Timeframe::Daily), None);
        assert_eq!(Period::from_timeframe(Timeframe::Weekly), Some(Period::Week));
        assert_eq!(Period::from_timeframe(Timeframe::Monthly), Some(Period::Month));
    }
}
