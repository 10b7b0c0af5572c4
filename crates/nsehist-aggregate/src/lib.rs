//! OHLCV resampling for nsehist.
//!
//! This crate turns a daily table into coarser periods:
//!
//! - [`Period`] - Weekly (Friday-anchored) or monthly calendar buckets
//! - [`PeriodResampler`] - Groups daily records into one record per bucket
//! - [`resample`] - Convenience entry point keyed by [`nsehist_types::Timeframe`]

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/nsehist/nsehist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod period;
mod resample;

pub use period::Period;
pub use resample::{PeriodResampler, ResampleError, resample};
