//! Download estimation logic.

use std::time::Duration;

use nsehist_fetch::Pacing;
use nsehist_types::{DateRange, Timeframe};

/// Assumed round trip for one archive request.
const DEFAULT_REQUEST_LATENCY: Duration = Duration::from_millis(400);

/// Trading days per ten calendar days.
const TRADING_DAYS_PER_TEN: usize = 7;

/// Trading days folded into one weekly record.
const TRADING_DAYS_PER_WEEK: usize = 5;

/// Trading days folded into one monthly record.
const TRADING_DAYS_PER_MONTH: usize = 20;

/// Estimated download metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadEstimate {
    /// Calendar days between the two ends (end - start).
    pub calendar_days: usize,
    /// Snapshot requests the fetch loop will issue (both ends included).
    pub requests: usize,
    /// Estimated trading days.
    pub trading_days: usize,
    /// Estimated output records for the timeframe.
    pub records: usize,
    /// Estimated wall-clock duration.
    pub duration: Duration,
}

/// Record count and run time estimator.
#[derive(Debug, Clone)]
pub struct Estimator {
    request_latency: Duration,
    pacing: Pacing,
}

impl Estimator {
    /// Creates an estimator assuming `request_latency` per request and
    /// the pauses of `pacing`.
    #[must_use]
    pub const fn new(request_latency: Duration, pacing: Pacing) -> Self {
        Self {
            request_latency,
            pacing,
        }
    }

    /// Returns an estimator with the default latency and the given pacing.
    #[must_use]
    pub const fn with_pacing(pacing: Pacing) -> Self {
        Self::new(DEFAULT_REQUEST_LATENCY, pacing)
    }

    /// Returns the assumed per-request latency.
    #[must_use]
    pub const fn request_latency(&self) -> Duration {
        self.request_latency
    }

    /// Estimates a download of `range` at `timeframe`.
    #[must_use]
    pub fn estimate(&self, range: DateRange, timeframe: Timeframe) -> DownloadEstimate {
        let calendar_days = range.span_days();
        let requests = range.total_days();
        let trading_days = Self::trading_days(calendar_days);
        let records = Self::records(trading_days, timeframe);

        let latency = self
            .request_latency
            .saturating_mul(u32::try_from(requests).unwrap_or(u32::MAX));
        let duration = latency.saturating_add(self.pacing.total_pause(requests, trading_days));

        DownloadEstimate {
            calendar_days,
            requests,
            trading_days,
            records,
            duration,
        }
    }

    /// Estimated trading days in `calendar_days` days.
    #[must_use]
    pub const fn trading_days(calendar_days: usize) -> usize {
        calendar_days * TRADING_DAYS_PER_TEN / 10
    }

    /// Estimated output records for `trading_days` at `timeframe`.
    #[must_use]
    pub const fn records(trading_days: usize, timeframe: Timeframe) -> usize {
        match timeframe {
            Timeframe::Daily => trading_days,
            Timeframe::Weekly => trading_days / TRADING_DAYS_PER_WEEK,
            Timeframe::Monthly => trading_days / TRADING_DAYS_PER_MONTH,
        }
    }

    /// Formats an estimate as a human-readable summary.
    #[must_use]
    pub fn format_estimate(estimate: &DownloadEstimate) -> String {
        format!(
            "Calendar days: {}\n\
             Requests: {}\n\
             Trading days: ~{}\n\
             Records: ~{}\n\
             Duration: ~{}",
            estimate.calendar_days,
            estimate.requests,
            estimate.trading_days,
            estimate.records,
            Self::format_duration(estimate.duration),
        )
    }

    /// Formats duration in human-readable form (e.g., "2h 30m", "45m").
    #[must_use]
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            if minutes > 0 {
                format!("{hours}h {minutes}m")
            } else {
                format!("{hours}h")
            }
        } else if minutes > 0 {
            if seconds > 0 && minutes < 10 {
                format!("{minutes}m {seconds}s")
            } else {
                format!("{minutes}m")
            }
        } else {
            format!("{seconds}s")
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::with_pacing(Pacing::cli_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range(days: i64) -> DateRange {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        DateRange::new(start, start + chrono::Duration::days(days)).unwrap()
    }

    #[test]
    fn test_record_counts() {
        let estimator = Estimator::default();

        let daily = estimator.estimate(range(100), Timeframe::Daily);
        assert_eq!(daily.calendar_days, 100);
        assert_eq!(daily.requests, 101);
        assert_eq!(daily.trading_days, 70);
        assert_eq!(daily.records, 70);

        assert_eq!(estimator.estimate(range(100), Timeframe::Weekly).records, 14);
        assert_eq!(estimator.estimate(range(100), Timeframe::Monthly).records, 3);
    }

    #[test]
    fn test_trading_days_rounds_down() {
        assert_eq!(Estimator::trading_days(30), 21);
        assert_eq!(Estimator::trading_days(3), 2);
        assert_eq!(Estimator::trading_days(1), 0);
    }

    #[test]
    fn test_duration_includes_pauses() {
        let estimator = Estimator::new(Duration::from_millis(500), Pacing::cli_default());
        // 31 requests: 15.5s of latency plus 3 pauses of 200ms
        let estimate = estimator.estimate(range(30), Timeframe::Daily);
        assert_eq!(estimate.duration, Duration::from_millis(16_100));

        let unpaced = Estimator::new(Duration::from_millis(500), Pacing::None);
        assert_eq!(
            unpaced.estimate(range(30), Timeframe::Daily).duration,
            Duration::from_millis(15_500)
        );
    }

    #[test]
    fn test_single_day() {
        let estimate = Estimator::default().estimate(range(0), Timeframe::Daily);
        assert_eq!(estimate.requests, 1);
        assert_eq!(estimate.records, 0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(Estimator::format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(Estimator::format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(Estimator::format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(Estimator::format_duration(Duration::from_secs(5400)), "1h 30m");
    }

    #[test]
    fn test_format_estimate() {
        let text = Estimator::format_estimate(&Estimator::default().estimate(range(30), Timeframe::Weekly));
        assert!(text.contains("Trading days: ~21"));
        assert!(text.contains("Records: ~4"));
    }
}
