//! OHLCV records and tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DateParseError, parse_date};

/// One OHLCV row: a trading day, or an aggregated week or month.
///
/// The date is kept exactly as the snapshot reported it (`DD-MM-YYYY`);
/// use [`OhlcvRecord::parsed_date`] where calendar math is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OhlcvRecord {
    /// Trading symbol or index name as listed by NSE.
    pub symbol: String,
    /// Trading day (or bucket end) as `DD-MM-YYYY`.
    pub date: String,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded quantity.
    pub volume: u64,
}

impl OhlcvRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        date: impl Into<String>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date: date.into(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Parses the record's date.
    ///
    /// # Errors
    ///
    /// Returns an error if the date is not `DD-MM-YYYY`.
    pub fn parsed_date(&self) -> Result<NaiveDate, DateParseError> {
        parse_date(&self.date)
    }
}

/// An ordered sequence of OHLCV records.
///
/// The fetch loop produces one in ascending date order; the resampler
/// produces a new one per bucket. An empty table is a valid result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OhlcvTable {
    records: Vec<OhlcvRecord>,
}

impl OhlcvTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, record: OhlcvRecord) {
        self.records.push(record);
    }

    /// Returns the records as a slice.
    #[must_use]
    pub fn records(&self) -> &[OhlcvRecord] {
        &self.records
    }

    /// Consumes the table, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<OhlcvRecord> {
        self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, OhlcvRecord> {
        self.records.iter()
    }

    /// Returns the first record.
    #[must_use]
    pub fn first(&self) -> Option<&OhlcvRecord> {
        self.records.first()
    }

    /// Returns the last record.
    #[must_use]
    pub fn last(&self) -> Option<&OhlcvRecord> {
        self.records.last()
    }

    /// Returns the symbol NSE reported, taken from the first record.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.first().map(|r| r.symbol.as_str())
    }

    /// Returns up to `n` leading records.
    #[must_use]
    pub fn head(&self, n: usize) -> &[OhlcvRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Returns up to `n` trailing records.
    #[must_use]
    pub fn tail(&self, n: usize) -> &[OhlcvRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }

    /// Returns the highest close.
    #[must_use]
    pub fn max_close(&self) -> Option<f64> {
        self.records.iter().map(|r| r.close).reduce(f64::max)
    }

    /// Returns the lowest close.
    #[must_use]
    pub fn min_close(&self) -> Option<f64> {
        self.records.iter().map(|r| r.close).reduce(f64::min)
    }

    /// Returns the summed volume of every record.
    #[must_use]
    pub fn total_volume(&self) -> u64 {
        self.records.iter().map(|r| r.volume).sum()
    }
}

impl From<Vec<OhlcvRecord>> for OhlcvTable {
    fn from(records: Vec<OhlcvRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<OhlcvRecord> for OhlcvTable {
    fn from_iter<I: IntoIterator<Item = OhlcvRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OhlcvTable {
    type Item = OhlcvRecord;
    type IntoIter = std::vec::IntoIter<OhlcvRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a OhlcvTable {
    type Item = &'a OhlcvRecord;
    type IntoIter = std::slice::Iter<'a, OhlcvRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
