//! Fetch, then resample.

use nsehist_aggregate::resample;
use nsehist_fetch::{DailyFetcher, FetchProgress, FetchReport, PacingPolicy, SnapshotSource};
use nsehist_types::{Configuration, NsehistError, OhlcvTable, Timeframe};

/// A finished download with at least one record.
#[derive(Debug, Clone)]
pub struct Download {
    report: FetchReport,
    table: OhlcvTable,
    timeframe: Timeframe,
}

impl Download {
    /// Returns the fetch report, including the raw daily table.
    #[must_use]
    pub const fn report(&self) -> &FetchReport {
        &self.report
    }

    /// Returns the table at the requested timeframe.
    #[must_use]
    pub const fn table(&self) -> &OhlcvTable {
        &self.table
    }

    /// Consumes the download, returning the table at the requested timeframe.
    #[must_use]
    pub fn into_table(self) -> OhlcvTable {
        self.table
    }

    /// Returns the requested timeframe.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }
}

/// How a download run ended.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    /// At least one trading day matched.
    Completed(Download),
    /// Nothing matched; the report says why.
    NoData(FetchReport),
}

/// Resamples a fetch report to `timeframe`.
///
/// # Errors
///
/// Returns an error if the daily table holds an unparseable date.
pub fn assemble(report: FetchReport, timeframe: Timeframe) -> Result<DownloadOutcome, NsehistError> {
    if report.is_empty() {
        return Ok(DownloadOutcome::NoData(report));
    }

    let table = resample(report.table(), timeframe)?;
    tracing::debug!(
        daily = report.table().len(),
        output = table.len(),
        timeframe = timeframe.code(),
        "assembled download"
    );

    Ok(DownloadOutcome::Completed(Download {
        report,
        table,
        timeframe,
    }))
}

/// Runs the daily fetch loop for `config` and resamples the result.
///
/// # Errors
///
/// Returns an error if the source fails fatally or resampling fails.
pub async fn download<S, P>(
    fetcher: &DailyFetcher<S, P>,
    config: &Configuration,
    progress: &mut impl FetchProgress,
) -> Result<DownloadOutcome, NsehistError>
where
    S: SnapshotSource,
    P: PacingPolicy,
{
    let report = fetcher.fetch(config, progress).await?;
    assemble(report, config.timeframe())
}
