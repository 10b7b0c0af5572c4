//! Pauses between snapshot requests.

use std::fmt::Debug;
use std::time::Duration;

use crate::{DayOutcome, DayProgress};

/// Decides, after each processed date, whether the fetch loop sleeps.
pub trait PacingPolicy: Debug + Send + Sync {
    /// Returns the pause to take after `progress`, if any.
    fn pause_after(&self, progress: &DayProgress) -> Option<Duration>;
}

/// Never pauses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPacing;

impl PacingPolicy for NoPacing {
    fn pause_after(&self, _progress: &DayProgress) -> Option<Duration> {
        None
    }
}

/// Pauses after every `every`-th processed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EveryNthDay {
    /// Period in processed dates.
    pub every: usize,
    /// Length of each pause.
    pub pause: Duration,
}

impl PacingPolicy for EveryNthDay {
    fn pause_after(&self, progress: &DayProgress) -> Option<Duration> {
        (self.every > 0 && progress.position.is_multiple_of(self.every)).then_some(self.pause)
    }
}

/// Pauses after every `every`-th matched date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EveryNthMatch {
    /// Period in matched dates.
    pub every: usize,
    /// Length of each pause.
    pub pause: Duration,
}

impl PacingPolicy for EveryNthMatch {
    fn pause_after(&self, progress: &DayProgress) -> Option<Duration> {
        (self.every > 0
            && progress.outcome == DayOutcome::Matched
            && progress.matched.is_multiple_of(self.every))
        .then_some(self.pause)
    }
}

/// A pacing policy chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// See [`NoPacing`].
    None,
    /// See [`EveryNthDay`].
    Days(EveryNthDay),
    /// See [`EveryNthMatch`].
    Matches(EveryNthMatch),
}

impl Pacing {
    /// Command-line preset: 200 ms after every 10th date.
    #[must_use]
    pub const fn cli_default() -> Self {
        Self::Days(EveryNthDay {
            every: 10,
            pause: Duration::from_millis(200),
        })
    }

    /// Web preset: 100 ms after every 5th match.
    #[must_use]
    pub const fn web_default() -> Self {
        Self::Matches(EveryNthMatch {
            every: 5,
            pause: Duration::from_millis(100),
        })
    }

    /// Returns the total time spent pausing over `days` dates of which
    /// `matches` produce a record.
    #[must_use]
    pub fn total_pause(&self, days: usize, matches: usize) -> Duration {
        let (count, pause) = match self {
            Self::None => (0, Duration::ZERO),
            Self::Days(p) => (days.checked_div(p.every).unwrap_or(0), p.pause),
            Self::Matches(p) => (matches.checked_div(p.every).unwrap_or(0), p.pause),
        };
        pause.saturating_mul(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::cli_default()
    }
}

impl PacingPolicy for Pacing {
    fn pause_after(&self, progress: &DayProgress) -> Option<Duration> {
        match self {
            Self::None => NoPacing.pause_after(progress),
            Self::Days(p) => p.pause_after(progress),
            Self::Matches(p) => p.pause_after(progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn progress(position: usize, matched: usize, outcome: DayOutcome) -> DayProgress {
        DayProgress {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            position,
            total: 100,
            matched,
            outcome,
        }
    }

    #[test]
    fn test_every_nth_day() {
        let pacing = Pacing::cli_default();
        let pauses: Vec<usize> = (1..=30)
            .filter(|&p| pacing.pause_after(&progress(p, 0, DayOutcome::Holiday)).is_some())
            .collect();
        assert_eq!(pauses, vec![10, 20, 30]);
    }

    #[test]
    fn test_every_nth_match_needs_a_match() {
        let pacing = Pacing::web_default();
        assert_eq!(
            pacing.pause_after(&progress(7, 5, DayOutcome::Matched)),
            Some(Duration::from_millis(100))
        );
        // Still 5 matched, but this date was a holiday
        assert_eq!(pacing.pause_after(&progress(8, 5, DayOutcome::Holiday)), None);
        assert_eq!(pacing.pause_after(&progress(9, 6, DayOutcome::Matched)), None);
    }

    #[test]
    fn test_zero_period_never_pauses() {
        let pacing = EveryNthDay {
            every: 0,
            pause: Duration::from_secs(1),
        };
        assert_eq!(pacing.pause_after(&progress(10, 0, DayOutcome::Matched)), None);
    }

    #[test]
    fn test_total_pause() {
        assert_eq!(
            Pacing::cli_default().total_pause(31, 21),
            Duration::from_millis(600)
        );
        assert_eq!(
            Pacing::web_default().total_pause(31, 21),
            Duration::from_millis(400)
        );
        assert_eq!(Pacing::None.total_pause(31, 21), Duration::ZERO);
    }
}
