//! NSE snapshot fetching for nsehist.
//!
//! This crate provides the data download pipeline:
//!
//! - [`url`] - NSE archive URLs
//! - [`SnapshotSource`] - One day's bhav copy table, from [`ArchiveClient`] or [`MemorySource`]
//! - [`parse_equity_snapshot`] / [`parse_index_snapshot`] - CSV snapshot parsing
//! - [`find_equity_row`] / [`find_index_row`] - Instrument matching
//! - [`PacingPolicy`] - Pauses between requests
//! - [`DailyFetcher`] - The sequential per-day fetch loop

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/nsehist/nsehist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod fetch;
mod matching;
mod pacing;
mod parse;
mod rows;
mod source;
pub mod url;

pub use client::{ArchiveClient, ClientConfig};
pub use fetch::{
    DailyFetcher, DayFailure, DayOutcome, DayProgress, FetchError, FetchProgress, FetchReport,
    FetchStats, MAX_RETAINED_FAILURES, NoProgress,
};
pub use matching::{find_equity_row, find_index_row};
pub use pacing::{EveryNthDay, EveryNthMatch, NoPacing, Pacing, PacingPolicy};
pub use parse::{ParseError, parse_equity_snapshot, parse_index_snapshot};
pub use rows::{EquityRow, IndexRow, RowParseError};
pub use source::{MemorySource, SnapshotKind, SnapshotSource, SourceError};
