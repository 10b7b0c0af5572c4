//! Historical NSE end-of-day data from the daily bhav copies.
//!
//! This is a facade crate that re-exports functionality from the nsehist
//! workspace crates for convenient access, and adds [`download`], which
//! chains the daily fetch loop and the period resampler.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/nsehist/nsehist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(all(feature = "fetch", feature = "aggregate"))]
mod pipeline;

// Re-export core types
pub use nsehist_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use nsehist_fetch::{
    ArchiveClient, ClientConfig, DailyFetcher, DayFailure, DayOutcome, DayProgress,
    EquityRow, EveryNthDay, EveryNthMatch, FetchError, FetchProgress, FetchReport, FetchStats,
    IndexRow, MAX_RETAINED_FAILURES, MemorySource, NoPacing, NoProgress, Pacing, PacingPolicy,
    SnapshotKind, SnapshotSource, SourceError,
};

// Re-export resampling
#[cfg(feature = "aggregate")]
pub use nsehist_aggregate::{Period, PeriodResampler, ResampleError, resample};

// Re-export formatters
#[cfg(feature = "format")]
pub use nsehist_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, OutputFormat, download_filename,
    export_filename, safe_symbol, write_file,
};

// Re-export estimation
#[cfg(feature = "estimate")]
pub use nsehist_estimate::{DownloadEstimate, Estimator};

#[cfg(all(feature = "fetch", feature = "aggregate"))]
pub use pipeline::{Download, DownloadOutcome, assemble, download};

/// Prelude module for convenient imports.
///
/// ```
/// use nsehist_lib::prelude::*;
/// ```
pub mod prelude {
    pub use nsehist_types::{
        Configuration, DateRange, InputError, InstrumentType, NsehistError, OhlcvRecord,
        OhlcvTable, Result, Timeframe, normalize_index_name,
    };

    #[cfg(feature = "fetch")]
    pub use nsehist_fetch::{
        ArchiveClient, ClientConfig, DailyFetcher, DayProgress, FetchProgress, FetchReport,
        NoProgress, Pacing, SnapshotSource,
    };

    #[cfg(feature = "aggregate")]
    pub use nsehist_aggregate::resample;

    #[cfg(feature = "format")]
    pub use nsehist_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat, write_file};

    #[cfg(feature = "estimate")]
    pub use nsehist_estimate::Estimator;

    #[cfg(all(feature = "fetch", feature = "aggregate"))]
    pub use crate::pipeline::{Download, DownloadOutcome, download};
}
