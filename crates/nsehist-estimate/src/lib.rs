//! Download estimation for nsehist.
//!
//! - [`Estimator`] - Computes estimates for a date range and timeframe
//! - [`DownloadEstimate`] - Estimated trading days, records and run time

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/nsehist/nsehist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod estimator;

pub use estimator::{DownloadEstimate, Estimator};
