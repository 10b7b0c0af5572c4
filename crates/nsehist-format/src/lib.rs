//! Output formatters for nsehist.
//!
//! This crate provides formatters for writing OHLCV tables:
//!
//! - [`CsvFormatter`] - CSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`export_filename`] / [`download_filename`] - Export file naming

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/nsehist/nsehist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod export;
mod formatter;
mod json;
mod naming;

pub use crate::csv::{CSV_HEADER, CsvFormatter};
pub use export::write_file;
pub use formatter::{FormatError, Formatter, OutputFormat};
pub use json::{JsonFormatter, JsonStyle};
pub use naming::{download_filename, export_filename, safe_symbol};
