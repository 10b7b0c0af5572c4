//! Core types for the nsehist NSE bhav copy downloader.
//!
//! This crate provides the fundamental data structures used throughout nsehist:
//!
//! - [`DateRange`] - Inclusive calendar-day range
//! - [`InstrumentType`] - Index vs Stock/ETF selection
//! - [`Timeframe`] - Daily, weekly or monthly output
//! - [`OhlcvRecord`] / [`OhlcvTable`] - Downloaded and resampled rows
//! - [`Configuration`] - Validated front-end input
//! - [`normalize_index_name`] - NSE index-name capitalization

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/nsehist/nsehist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod date;
mod date_range;
mod error;
mod instrument;
mod record;
mod symbol;
mod timeframe;

pub use config::Configuration;
pub use date::{COMPACT_DATE_FORMAT, DATE_FORMAT, format_compact, format_date, parse_date};
pub use date_range::{DateRange, DayIterator};
pub use error::{DateParseError, DateRangeError, InputError, NsehistError, Result};
pub use instrument::{InstrumentType, InstrumentTypeParseError};
pub use record::{OhlcvRecord, OhlcvTable};
pub use symbol::{normalize_index_name, normalize_index_name_opt};
pub use timeframe::{Timeframe, TimeframeParseError};
