//! The snapshot source seam.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::{EquityRow, IndexRow};

/// Text NSE uses for dates without a published snapshot.
const NO_DATA_MARKER: &str = "No data available";

/// Which daily snapshot a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    /// Equity bhav copy with delivery data.
    Equity,
    /// Index close snapshot.
    Index,
}

/// Errors a snapshot source can report for a single date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The exchange published nothing for the date (weekend or holiday).
    #[error("No data available for {0}")]
    NoData(NaiveDate),

    /// The request failed in transit.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with an error status.
    #[error("Server error: {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The snapshot body was not the expected CSV.
    #[error("Malformed snapshot: {0}")]
    Malformed(String),

    /// The client itself is misconfigured; no request can succeed.
    #[error("Client configuration error: {0}")]
    Config(String),
}

impl SourceError {
    /// Returns true if the error means "nothing published for this date".
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_)) || self.to_string().contains(NO_DATA_MARKER)
    }

    /// Returns true if the error should abort the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Provides one day's bhav copy table.
///
/// `Ok(None)` means the exchange published no table for the date.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches the equity-with-delivery snapshot for `date`.
    async fn equity_snapshot(&self, date: NaiveDate)
    -> Result<Option<Vec<EquityRow>>, SourceError>;

    /// Fetches the index close snapshot for `date`.
    async fn index_snapshot(&self, date: NaiveDate) -> Result<Option<Vec<IndexRow>>, SourceError>;
}

#[async_trait]
impl<T: SnapshotSource + ?Sized> SnapshotSource for Arc<T> {
    async fn equity_snapshot(
        &self,
        date: NaiveDate,
    ) -> Result<Option<Vec<EquityRow>>, SourceError> {
        (**self).equity_snapshot(date).await
    }

    async fn index_snapshot(&self, date: NaiveDate) -> Result<Option<Vec<IndexRow>>, SourceError> {
        (**self).index_snapshot(date).await
    }
}

/// An in-memory snapshot source.
///
/// Dates without a configured table answer `Ok(None)`. Every request is
/// logged so callers can assert on how the fetch loop drove the source.
#[derive(Debug, Default)]
pub struct MemorySource {
    equity: HashMap<NaiveDate, Vec<EquityRow>>,
    index: HashMap<NaiveDate, Vec<IndexRow>>,
    failures: HashMap<NaiveDate, SourceError>,
    requests: Mutex<Vec<(SnapshotKind, NaiveDate)>>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `rows` as the equity snapshot for `date`.
    #[must_use]
    pub fn with_equity(mut self, date: NaiveDate, rows: Vec<EquityRow>) -> Self {
        self.equity.insert(date, rows);
        self
    }

    /// Serves `rows` as the index snapshot for `date`.
    #[must_use]
    pub fn with_index(mut self, date: NaiveDate, rows: Vec<IndexRow>) -> Self {
        self.index.insert(date, rows);
        self
    }

    /// Answers every request for `date` with `error`.
    #[must_use]
    pub fn with_failure(mut self, date: NaiveDate, error: SourceError) -> Self {
        self.failures.insert(date, error);
        self
    }

    /// Returns every request made so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<(SnapshotKind, NaiveDate)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of requests made so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn log(&self, kind: SnapshotKind, date: NaiveDate) -> Result<(), SourceError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((kind, date));
        self.failures.get(&date).map_or(Ok(()), |e| Err(e.clone()))
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn equity_snapshot(
        &self,
        date: NaiveDate,
    ) -> Result<Option<Vec<EquityRow>>, SourceError> {
        self.log(SnapshotKind::Equity, date)?;
        Ok(self.equity.get(&date).cloned())
    }

    async fn index_snapshot(&self, date: NaiveDate) -> Result<Option<Vec<IndexRow>>, SourceError> {
        self.log(SnapshotKind::Index, date)?;
        Ok(self.index.get(&date).cloned())
    }
}
