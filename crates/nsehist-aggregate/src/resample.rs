//! Daily-to-period OHLCV resampling.

use chrono::NaiveDate;
use nsehist_types::{NsehistError, OhlcvRecord, OhlcvTable, Timeframe, format_date};
use thiserror::Error;

use crate::Period;

/// Errors that can occur while resampling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResampleError {
    /// A record's date is not `DD-MM-YYYY`.
    #[error("invalid date '{date}' in row {row}, expected DD-MM-YYYY")]
    InvalidDate {
        /// Zero-based row index in the input table.
        row: usize,
        /// The offending date text.
        date: String,
    },
}

impl From<ResampleError> for NsehistError {
    fn from(err: ResampleError) -> Self {
        Self::Resample(err.to_string())
    }
}

/// Resamples a daily table to the given timeframe.
///
/// `Timeframe::Daily` returns a copy of the input untouched.
///
/// # Errors
///
/// Returns an error if any record's date does not parse; no partial
/// result is produced.
pub fn resample(table: &OhlcvTable, timeframe: Timeframe) -> Result<OhlcvTable, ResampleError> {
    match Period::from_timeframe(timeframe) {
        Some(period) => PeriodResampler::new(period).resample(table),
        None => Ok(table.clone()),
    }
}

/// Groups daily records into calendar buckets.
///
/// The input may be in any order: rows are re-indexed by their parsed date
/// first, so the output is ascending by bucket and independent of input
/// order. Rows sharing a date keep their input order.
#[derive(Debug, Clone, Copy)]
pub struct PeriodResampler {
    period: Period,
}

impl PeriodResampler {
    /// Creates a resampler for the given bucket size.
    #[must_use]
    pub const fn new(period: Period) -> Self {
        Self { period }
    }

    /// Returns the bucket size.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Aggregates `table` into one record per non-empty bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if any record's date does not parse.
    pub fn resample(&self, table: &OhlcvTable) -> Result<OhlcvTable, ResampleError> {
        let mut dated = table
            .iter()
            .enumerate()
            .map(|(row, record)| {
                record
                    .parsed_date()
                    .map(|date| (date, record))
                    .map_err(|_| ResampleError::InvalidDate {
                        row,
                        date: record.date.clone(),
                    })
            })
            .collect::<Result<Vec<(NaiveDate, &OhlcvRecord)>, _>>()?;

        // Stable, so equal dates keep input order
        dated.sort_by_key(|(date, _)| *date);

        let mut output = OhlcvTable::new();
        let mut current: Option<BucketBuilder> = None;

        for (date, record) in dated {
            let bucket_end = self.period.bucket_end(date);

            match current.take() {
                Some(mut builder) if builder.end == bucket_end => {
                    builder.update(record);
                    current = Some(builder);
                }
                Some(builder) => {
                    output.push(builder.finish());
                    current = Some(BucketBuilder::new(bucket_end, record));
                }
                None => current = Some(BucketBuilder::new(bucket_end, record)),
            }
        }

        if let Some(builder) = current {
            output.push(builder.finish());
        }

        tracing::debug!(
            period = ?self.period,
            input = table.len(),
            output = output.len(),
            "resampled table"
        );

        Ok(output)
    }
}

/// Accumulator for a single bucket.
#[derive(Debug)]
struct BucketBuilder {
    end: NaiveDate,
    symbol: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl BucketBuilder {
    /// Starts a bucket from its earliest record.
    fn new(end: NaiveDate, record: &OhlcvRecord) -> Self {
        Self {
            end,
            symbol: record.symbol.clone(),
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        }
    }

    /// Folds in the next record by date.
    fn update(&mut self, record: &OhlcvRecord) {
        self.high = self.high.max(record.high);
        self.low = self.low.min(record.low);
        self.close = record.close;
        self.volume = self.volume.saturating_add(record.volume);
    }

    fn finish(self) -> OhlcvRecord {
        OhlcvRecord {
            symbol: self.symbol,
            date: format_date(self.end),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}
