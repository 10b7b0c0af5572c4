//! The daily fetch loop.

use chrono::NaiveDate;
use nsehist_types::{Configuration, InstrumentType, NsehistError, OhlcvRecord, OhlcvTable};
use thiserror::Error;

use crate::{PacingPolicy, SnapshotSource, SourceError, find_equity_row, find_index_row};

/// Number of per-day failure messages kept in a [`FetchReport`].
pub const MAX_RETAINED_FAILURES: usize = 5;

/// Errors that abort a fetch run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The snapshot source can never succeed.
    #[error("snapshot source failed: {0}")]
    Source(#[from] SourceError),
}

impl From<FetchError> for NsehistError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err.to_string())
    }
}

/// What happened for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayOutcome {
    /// A row for the symbol was found and recorded.
    Matched,
    /// No snapshot exists for the date (weekend or exchange holiday).
    Holiday,
    /// A snapshot exists but does not list the symbol.
    Unmatched,
    /// The request or the matched row failed.
    Failed,
}

/// Progress after one processed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayProgress {
    /// The date just processed.
    pub date: NaiveDate,
    /// One-based position of `date` in the range.
    pub position: usize,
    /// Number of dates in the range.
    pub total: usize,
    /// Records collected so far, this date included.
    pub matched: usize,
    /// Outcome for `date`.
    pub outcome: DayOutcome,
}

/// Observer for per-date progress.
pub trait FetchProgress {
    /// Called once after each date, in ascending order.
    fn on_day(&mut self, progress: &DayProgress);
}

impl<F: FnMut(&DayProgress)> FetchProgress for F {
    fn on_day(&mut self, progress: &DayProgress) {
        self(progress);
    }
}

/// A [`FetchProgress`] that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn on_day(&mut self, _progress: &DayProgress) {}
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Dates processed.
    pub days_processed: usize,
    /// Dates that produced a record.
    pub matched: usize,
    /// Dates without a snapshot.
    pub holidays: usize,
    /// Dates whose snapshot did not list the symbol.
    pub unmatched: usize,
    /// Dates whose request or row failed.
    pub failed: usize,
}

impl FetchStats {
    fn record(&mut self, outcome: DayOutcome) {
        self.days_processed += 1;
        match outcome {
            DayOutcome::Matched => self.matched += 1,
            DayOutcome::Holiday => self.holidays += 1,
            DayOutcome::Unmatched => self.unmatched += 1,
            DayOutcome::Failed => self.failed += 1,
        }
    }
}

/// A failed date and its error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFailure {
    /// The date that failed.
    pub date: NaiveDate,
    /// Error text.
    pub message: String,
}

/// The result of a fetch run: the daily table plus statistics.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    table: OhlcvTable,
    stats: FetchStats,
    failures: Vec<DayFailure>,
}

impl FetchReport {
    /// Returns the collected daily table, ascending by date.
    #[must_use]
    pub const fn table(&self) -> &OhlcvTable {
        &self.table
    }

    /// Consumes the report, returning the table.
    #[must_use]
    pub fn into_table(self) -> OhlcvTable {
        self.table
    }

    /// Returns the run counters.
    #[must_use]
    pub const fn stats(&self) -> FetchStats {
        self.stats
    }

    /// Returns the first failures of the run (at most
    /// [`MAX_RETAINED_FAILURES`]).
    #[must_use]
    pub fn failures(&self) -> &[DayFailure] {
        &self.failures
    }

    /// Returns true if no date produced a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn fail(&mut self, date: NaiveDate, message: String) {
        if self.failures.len() < MAX_RETAINED_FAILURES {
            self.failures.push(DayFailure { date, message });
        }
    }
}

/// Result of looking one date up, before it is counted.
enum DayLookup {
    Found(OhlcvRecord),
    NoSnapshot,
    NoMatch,
    BadRow(String),
}

/// Walks a date range one snapshot at a time.
///
/// Requests are strictly sequential and ascending; nothing is retried.
/// Per-date problems are counted in [`FetchStats`]; only a fatal
/// [`SourceError`] ends the run early.
#[derive(Debug, Clone)]
pub struct DailyFetcher<S, P> {
    source: S,
    pacing: P,
}

impl<S: SnapshotSource, P: PacingPolicy> DailyFetcher<S, P> {
    /// Creates a fetcher over `source` paced by `pacing`.
    #[must_use]
    pub const fn new(source: S, pacing: P) -> Self {
        Self { source, pacing }
    }

    /// Returns the snapshot source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the pacing policy.
    #[must_use]
    pub const fn pacing(&self) -> &P {
        &self.pacing
    }

    /// Fetches every date of `config`'s range.
    ///
    /// # Errors
    ///
    /// Returns an error only if the source reports a fatal error.
    pub async fn fetch(
        &self,
        config: &Configuration,
        progress: &mut impl FetchProgress,
    ) -> Result<FetchReport, FetchError> {
        let range = config.range();
        let total = range.total_days();
        let instrument = config.instrument_type();
        let symbol = config.resolved_symbol();

        tracing::info!(
            %symbol,
            instrument = instrument.as_str(),
            %range,
            days = total,
            "starting fetch"
        );

        let mut report = FetchReport::default();

        for (index, date) in range.days().enumerate() {
            let outcome = match self.lookup(instrument, &symbol, date).await {
                Ok(DayLookup::Found(record)) => {
                    report.table.push(record);
                    DayOutcome::Matched
                }
                Ok(DayLookup::NoSnapshot) => DayOutcome::Holiday,
                Ok(DayLookup::NoMatch) => DayOutcome::Unmatched,
                Ok(DayLookup::BadRow(message)) => {
                    tracing::warn!(%date, %message, "unusable row");
                    report.fail(date, message);
                    DayOutcome::Failed
                }
                Err(err) if err.is_fatal() => {
                    tracing::error!(%date, error = %err, "aborting fetch");
                    return Err(err.into());
                }
                Err(err) if err.is_no_data() => DayOutcome::Holiday,
                Err(err) => {
                    tracing::warn!(%date, error = %err, "download failed");
                    report.fail(date, err.to_string());
                    DayOutcome::Failed
                }
            };

            report.stats.record(outcome);
            tracing::debug!(%date, ?outcome, "processed date");

            let day = DayProgress {
                date,
                position: index + 1,
                total,
                matched: report.stats.matched,
                outcome,
            };
            progress.on_day(&day);

            if let Some(pause) = self.pacing.pause_after(&day) {
                tokio::time::sleep(pause).await;
            }
        }

        let stats = report.stats;
        tracing::info!(
            matched = stats.matched,
            holidays = stats.holidays,
            unmatched = stats.unmatched,
            failed = stats.failed,
            "fetch complete"
        );

        Ok(report)
    }

    async fn lookup(
        &self,
        instrument: InstrumentType,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<DayLookup, SourceError> {
        let found = match instrument {
            InstrumentType::Stock => {
                let Some(rows) = self.source.equity_snapshot(date).await? else {
                    return Ok(DayLookup::NoSnapshot);
                };
                find_equity_row(&rows, symbol).map(|row| row.to_record(date))
            }
            InstrumentType::Index => {
                let Some(rows) = self.source.index_snapshot(date).await? else {
                    return Ok(DayLookup::NoSnapshot);
                };
                find_index_row(&rows, symbol).map(|row| row.to_record(date))
            }
        };

        Ok(match found {
            Some(Ok(record)) => DayLookup::Found(record),
            Some(Err(err)) => DayLookup::BadRow(err.to_string()),
            None => DayLookup::NoMatch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EquityRow, IndexRow, MemorySource, NoPacing, Pacing, SnapshotKind};
    use approx::assert_relative_eq;
    use nsehist_types::{DateRange, Timeframe};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn index_row(name: &str, day: NaiveDate, close: &str) -> IndexRow {
        IndexRow {
            name: name.into(),
            date: nsehist_types::format_date(day),
            open: "100".into(),
            high: "110".into(),
            low: "90".into(),
            close: close.into(),
            volume: "1000".into(),
        }
    }

    fn equity_row(symbol: &str, close: &str) -> EquityRow {
        EquityRow {
            symbol: symbol.into(),
            series: "EQ".into(),
            open: "10".into(),
            high: "12".into(),
            low: "9".into(),
            close: close.into(),
            volume: "500".into(),
        }
    }

    fn config(kind: InstrumentType, symbol: &str, from: NaiveDate, to: NaiveDate) -> Configuration {
        Configuration::new(kind, symbol, DateRange::new(from, to).unwrap(), Timeframe::Daily)
    }

    #[tokio::test]
    async fn test_single_day_index() {
        let day = date(2025, 2, 3);
        let source = Arc::new(MemorySource::new().with_index(
            day,
            vec![
                index_row("NIFTY 50", day, "23361.05"),
                index_row("NIFTY BANK", day, "49210.55"),
            ],
        ));
        let fetcher = DailyFetcher::new(Arc::clone(&source), NoPacing);

        let report = fetcher
            .fetch(&config(InstrumentType::Index, "nifty 50", day, day), &mut NoProgress)
            .await
            .unwrap();

        assert_eq!(source.request_count(), 1);
        assert_eq!(report.table().len(), 1);
        let record = &report.table().records()[0];
        assert_eq!(record.symbol, "NIFTY 50");
        assert_eq!(record.date, "03-02-2025");
        assert_relative_eq!(record.close, 23361.05);
    }

    #[tokio::test]
    async fn test_weekend_only_range() {
        // Sat 01-02-2025 and Sun 02-02-2025
        let source = Arc::new(MemorySource::new());
        let fetcher = DailyFetcher::new(Arc::clone(&source), NoPacing);

        let report = fetcher
            .fetch(
                &config(InstrumentType::Index, "NIFTY 50", date(2025, 2, 1), date(2025, 2, 2)),
                &mut NoProgress,
            )
            .await
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.stats().holidays, 2);
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let mut source = MemorySource::new();
        for d in 3..=7 {
            source = source.with_equity(date(2025, 2, d), vec![equity_row("TCS", "4000")]);
        }
        let fetcher = DailyFetcher::new(source, NoPacing);

        let report = fetcher
            .fetch(
                &config(InstrumentType::Stock, "NOSUCHSYMBOL", date(2025, 2, 3), date(2025, 2, 7)),
                &mut NoProgress,
            )
            .await
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.stats().unmatched, 5);
        assert_eq!(report.stats().failed, 0);
    }

    #[tokio::test]
    async fn test_dates_ascending_within_range() {
        let from = date(2025, 1, 27);
        let to = date(2025, 2, 9);
        let mut source = MemorySource::new();
        for day in DateRange::new(from, to).unwrap().days() {
            source = source.with_equity(day, vec![equity_row("INFY", "1850")]);
        }
        let fetcher = DailyFetcher::new(Arc::new(source), NoPacing);

        let mut seen = Vec::new();
        let mut observer = |p: &DayProgress| seen.push(p.date);
        let report = fetcher
            .fetch(&config(InstrumentType::Stock, "INFY", from, to), &mut observer)
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = report
            .table()
            .iter()
            .map(|r| r.parsed_date().unwrap())
            .collect();
        assert_eq!(dates.len(), 14);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(dates.iter().all(|d| (from..=to).contains(d)));
        assert_eq!(seen, dates);
    }

    #[tokio::test]
    async fn test_stock_requires_exact_symbol() {
        let day = date(2025, 2, 3);
        let source = MemorySource::new().with_equity(
            day,
            vec![equity_row("RELIANCEPP", "1"), equity_row("RELIANCE", "1251.4")],
        );
        let fetcher = DailyFetcher::new(source, NoPacing);

        let cfg = config(InstrumentType::Stock, "reliance", day, day);
        let report = fetcher.fetch(&cfg, &mut NoProgress).await.unwrap();

        assert_eq!(report.table().len(), 1);
        assert_eq!(report.table().records()[0].symbol, "RELIANCE");
        assert_relative_eq!(report.table().records()[0].close, 1251.4);
    }

    #[tokio::test]
    async fn test_index_substring_fallback() {
        let day = date(2025, 2, 3);
        let source = MemorySource::new()
            .with_index(day, vec![index_row("Nifty Financial Services", day, "24000")]);
        let fetcher = DailyFetcher::new(source, NoPacing);

        let cfg = config(InstrumentType::Index, "nifty financial", day, day);
        let report = fetcher.fetch(&cfg, &mut NoProgress).await.unwrap();

        assert_eq!(report.table().records()[0].symbol, "Nifty Financial Services");
    }

    #[tokio::test]
    async fn test_failure_classification() {
        let from = date(2025, 2, 3);
        let to = date(2025, 2, 12);
        let mut source = MemorySource::new()
            .with_failure(date(2025, 2, 3), SourceError::Http("No data available for 03-02-2025".into()))
            .with_index(date(2025, 2, 4), vec![index_row("NIFTY 50", date(2025, 2, 4), "n/a")]);
        for d in 5..=12 {
            source = source.with_failure(
                date(2025, 2, d),
                SourceError::Status {
                    status: 503,
                    url: format!("u{d}"),
                },
            );
        }
        let fetcher = DailyFetcher::new(source, NoPacing);

        let report = fetcher
            .fetch(&config(InstrumentType::Index, "NIFTY 50", from, to), &mut NoProgress)
            .await
            .unwrap();

        let stats = report.stats();
        assert_eq!(stats.days_processed, 10);
        assert_eq!(stats.holidays, 1);
        assert_eq!(stats.failed, 9);
        assert_eq!(report.failures().len(), MAX_RETAINED_FAILURES);
        assert_eq!(report.failures()[0].date, date(2025, 2, 4));
        assert!(report.failures()[0].message.contains("Closing Index Value"));
    }

    #[tokio::test]
    async fn test_fatal_error_aborts() {
        let from = date(2025, 2, 3);
        let source = Arc::new(
            MemorySource::new().with_failure(from, SourceError::Config("bad url".into())),
        );
        let fetcher = DailyFetcher::new(Arc::clone(&source), NoPacing);

        let err = fetcher
            .fetch(
                &config(InstrumentType::Stock, "TCS", from, date(2025, 2, 7)),
                &mut NoProgress,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Source(SourceError::Config(_))));
        assert_eq!(source.requests(), vec![(SnapshotKind::Equity, from)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_sleeps() {
        let from = date(2025, 1, 1);
        let to = date(2025, 1, 20);
        let fetcher = DailyFetcher::new(MemorySource::new(), Pacing::cli_default());

        let started = tokio::time::Instant::now();
        fetcher
            .fetch(&config(InstrumentType::Index, "NIFTY 50", from, to), &mut NoProgress)
            .await
            .unwrap();

        assert_eq!(started.elapsed(), std::time::Duration::from_millis(400));
    }
}
