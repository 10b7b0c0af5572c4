//! Per-browser session state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use nsehist_lib::{Configuration, DayProgress, Download, DownloadEstimate, FetchStats};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

/// Unique identifier for a browser session.
pub type SessionId = Uuid;

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Status of a session's download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Nothing submitted yet, or the result was cleared.
    #[default]
    Idle,
    /// A download is running.
    Running,
    /// The last download produced a table.
    Completed,
    /// The last download matched nothing.
    NoData,
    /// The last download aborted.
    Failed,
}

impl JobStatus {
    /// Returns the status as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::NoData => "no_data",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A second submit arrived while a download was still running.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("A download is already running. Please wait for it to finish.")]
pub struct SessionBusy;

/// One browser's download state and result holder.
#[derive(Debug, Default)]
pub struct Session {
    status: JobStatus,
    config: Option<Configuration>,
    estimate: Option<DownloadEstimate>,
    progress: Option<DayProgress>,
    stats: Option<FetchStats>,
    result: Option<Download>,
    error: Option<String>,
    notice: Option<String>,
}

impl Session {
    /// Returns the download status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the configuration of the current or last run.
    #[must_use]
    pub const fn config(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    /// Returns the estimate made when the run started.
    #[must_use]
    pub const fn estimate(&self) -> Option<&DownloadEstimate> {
        self.estimate.as_ref()
    }

    /// Returns the latest per-day progress.
    #[must_use]
    pub const fn progress(&self) -> Option<&DayProgress> {
        self.progress.as_ref()
    }

    /// Returns the statistics of the last finished run.
    #[must_use]
    pub const fn stats(&self) -> Option<&FetchStats> {
        self.stats.as_ref()
    }

    /// Returns the stored result.
    #[must_use]
    pub const fn result(&self) -> Option<&Download> {
        self.result.as_ref()
    }

    /// Returns the error of the last failed run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Starts a run, dropping any previous result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionBusy`] if a run is already in progress.
    pub fn begin(
        &mut self,
        config: Configuration,
        estimate: DownloadEstimate,
    ) -> Result<(), SessionBusy> {
        if self.status == JobStatus::Running {
            return Err(SessionBusy);
        }
        self.clear();
        self.status = JobStatus::Running;
        self.config = Some(config);
        self.estimate = Some(estimate);
        Ok(())
    }

    /// Records per-day progress of the running download.
    pub fn update(&mut self, progress: DayProgress) {
        self.progress = Some(progress);
    }

    /// Stores a finished download.
    pub fn store(&mut self, download: Download) {
        self.stats = Some(download.report().stats());
        self.result = Some(download);
        self.status = JobStatus::Completed;
    }

    /// Marks the run as finished without data.
    pub fn no_data(&mut self, stats: FetchStats) {
        self.stats = Some(stats);
        self.status = JobStatus::NoData;
    }

    /// Marks the run as aborted.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.status = JobStatus::Failed;
    }

    /// Drops the result and every trace of the last run.
    ///
    /// A pending notice survives.
    pub fn clear(&mut self) {
        let notice = self.notice.take();
        *self = Self {
            notice,
            ..Self::default()
        };
    }

    /// Leaves a one-shot message for the next page render.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Takes the pending notice, if any.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}

/// Locks a session, recovering from a poisoned lock.
pub fn lock(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sessions idle for longer than this are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Upper bound on live sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

#[derive(Debug)]
struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

impl Entry {
    fn is_running(&self) -> bool {
        lock(&self.handle).status() == JobStatus::Running
    }
}

/// All live sessions, keyed by cookie id.
///
/// Sessions not seen for `idle_ttl` are evicted, and the least recently
/// seen one makes room once `max_sessions` is reached. A session with a
/// running download is never evicted.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    /// Creates an empty store with the default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given idle timeout and capacity.
    #[must_use]
    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Returns the session for `id`, if it exists, and marks it as seen.
    pub async fn get(&self, id: SessionId) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.handle))
    }

    /// Returns the session for `id`, creating one under a fresh id when
    /// `id` is absent or unknown. The flag is true for a new session.
    pub async fn get_or_create(&self, id: Option<SessionId>) -> (SessionId, SessionHandle, bool) {
        if let Some(id) = id {
            if let Some(handle) = self.get(id).await {
                return (id, handle, false);
            }
        }

        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions, now);
        if sessions.len() >= self.max_sessions {
            evict_least_recent(&mut sessions);
        }

        let id = Uuid::new_v4();
        let handle = SessionHandle::default();
        sessions.insert(
            id,
            Entry {
                handle: Arc::clone(&handle),
                last_seen: now,
            },
        );
        tracing::debug!(session = %id, live = sessions.len(), "created session");
        (id, handle, true)
    }

    /// Drops every idle session. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions, Instant::now())
    }

    fn evict_idle(&self, sessions: &mut HashMap<SessionId, Entry>, now: Instant) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.duration_since(entry.last_seen) <= self.idle_ttl || entry.is_running()
        });
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, live = sessions.len(), "evicted idle sessions");
        }
        removed
    }

    /// Returns the number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns true if there are no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn evict_least_recent(sessions: &mut HashMap<SessionId, Entry>) {
    let oldest = sessions
        .iter()
        .filter(|(_, entry)| !entry.is_running())
        .min_by_key(|(_, entry)| entry.last_seen)
        .map(|(id, _)| *id);
    if let Some(id) = oldest {
        sessions.remove(&id);
        tracing::debug!(session = %id, "evicted least recently seen session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nsehist_lib::{DateRange, InstrumentType, Timeframe};

    fn config() -> Configuration {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        Configuration::new(
            InstrumentType::Index,
            "NIFTY 50",
            DateRange::new(from, to).unwrap(),
            Timeframe::Daily,
        )
    }

    fn estimate() -> DownloadEstimate {
        DownloadEstimate {
            calendar_days: 30,
            requests: 31,
            trading_days: 21,
            records: 21,
            duration: Duration::from_secs(15),
        }
    }

    #[test]
    fn test_second_begin_rejected_while_running() {
        let mut session = Session::default();
        session.begin(config(), estimate()).unwrap();
        assert_eq!(session.status(), JobStatus::Running);
        assert_eq!(session.begin(config(), estimate()), Err(SessionBusy));

        session.no_data(FetchStats::default());
        assert!(session.begin(config(), estimate()).is_ok());
    }

    #[test]
    fn test_clear_keeps_notice() {
        let mut session = Session::default();
        session.begin(config(), estimate()).unwrap();
        session.fail("boom");
        session.notify("hello");

        session.clear();
        assert_eq!(session.status(), JobStatus::Idle);
        assert!(session.config().is_none());
        assert!(session.error().is_none());
        assert_eq!(session.take_notice().as_deref(), Some("hello"));
        assert!(session.take_notice().is_none());
    }

    #[tokio::test]
    async fn test_store_reuses_known_ids() {
        let store = SessionStore::new();
        let (id, first, created) = store.get_or_create(None).await;
        assert!(created);

        let (same, second, created) = store.get_or_create(Some(id)).await;
        assert!(!created);
        assert_eq!(same, id);
        assert!(Arc::ptr_eq(&first, &second));

        let (other, _, created) = store.get_or_create(Some(Uuid::new_v4())).await;
        assert!(created);
        assert_ne!(other, id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let store = SessionStore::with_limits(Duration::from_secs(60), 10);
        let (old, _, _) = store.get_or_create(None).await;
        tokio::time::advance(Duration::from_secs(30)).await;
        let (fresh, _, _) = store.get_or_create(None).await;
        tokio::time::advance(Duration::from_secs(45)).await;

        assert_eq!(store.sweep().await, 1);
        assert!(store.get(old).await.is_none());
        assert!(store.get(fresh).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_session_survives_sweep() {
        let store = SessionStore::with_limits(Duration::from_secs(60), 10);
        let (id, handle, _) = store.get_or_create(None).await;
        lock(&handle).begin(config(), estimate()).unwrap();

        tokio::time::advance(Duration::from_secs(600)).await;
        assert_eq!(store.sweep().await, 0);

        lock(&handle).no_data(FetchStats::default());
        assert_eq!(store.sweep().await, 1);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_least_recently_seen() {
        let store = SessionStore::with_limits(Duration::from_secs(3600), 2);
        let (a, _, _) = store.get_or_create(None).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        let (b, _, _) = store.get_or_create(None).await;
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(store.get(a).await.is_some());

        let (c, _, _) = store.get_or_create(None).await;
        assert_eq!(store.len().await, 2);
        assert!(store.get(b).await.is_none());
        assert!(store.get(a).await.is_some());
        assert!(store.get(c).await.is_some());
    }
}
