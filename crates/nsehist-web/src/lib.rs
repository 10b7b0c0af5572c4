//! Browser front-end for nsehist.
//!
//! One form, one download per browser session, results kept in memory
//! until the session is reset.
//!
//! # Modules
//!
//! - `session`: per-browser state and the session store
//! - `form`: form fields and validation
//! - `page`: HTML rendering
//! - `routes`: HTTP handlers
//! - `server`: listener and shutdown

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/nsehist/nsehist/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod form;
mod page;
mod routes;
mod server;
mod session;

pub use form::{DEFAULT_LOOKBACK_DAYS, DownloadForm, FormError, HTML_DATE_FORMAT, html_date};
pub use page::{escape, render};
pub use routes::{AppState, SESSION_COOKIE, WebFetcher, router};
pub use server::{DEFAULT_BIND, SWEEP_INTERVAL, WebConfig, WebError, serve, spawn_sweeper};
pub use session::{
    DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS, JobStatus, Session, SessionBusy, SessionHandle,
    SessionId, SessionStore, lock,
};
