//! HTTP handlers.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Local;
use nsehist_lib::{
    Configuration, DailyFetcher, DayProgress, DownloadOutcome, Estimator, OutputFormat, Pacing,
    SnapshotSource, download, download_filename,
};
use serde::Serialize;

use crate::form::DownloadForm;
use crate::page;
use crate::session::{JobStatus, SessionHandle, SessionId, SessionStore, lock};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "nsehist_session";

/// Fetcher shared by every session.
pub type WebFetcher = DailyFetcher<Arc<dyn SnapshotSource>, Pacing>;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    sessions: SessionStore,
    fetcher: Arc<WebFetcher>,
    estimator: Estimator,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions)
            .field("pacing", self.fetcher.pacing())
            .field("estimator", &self.estimator)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates state over `source`, paced by `pacing`.
    #[must_use]
    pub fn new(source: Arc<dyn SnapshotSource>, pacing: Pacing) -> Self {
        Self {
            sessions: SessionStore::new(),
            fetcher: Arc::new(DailyFetcher::new(source, pacing)),
            estimator: Estimator::with_pacing(pacing),
        }
    }

    /// Returns the session store.
    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/download", post(submit))
        .route("/progress", get(progress))
        .route("/export.csv", get(export_csv))
        .route("/reset", post(reset))
        .with_state(state)
}

async fn index(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (id, handle, created) = state.sessions.get_or_create(session_id(&jar)).await;
    let html = {
        let mut session = lock(&handle);
        let notice = session.take_notice();
        page::render(&session, notice.as_deref(), Local::now().date_naive())
    };
    (remember(jar, id, created), Html(html)).into_response()
}

async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<DownloadForm>,
) -> Response {
    let (id, handle, created) = state.sessions.get_or_create(session_id(&jar)).await;

    match form.validate(Local::now().date_naive()) {
        Ok(config) => {
            let estimate = state.estimator.estimate(config.range(), config.timeframe());
            let started = lock(&handle).begin(config.clone(), estimate);
            match started {
                Ok(()) => {
                    tracing::info!(
                        session = %id,
                        symbol = %config.resolved_symbol(),
                        range = %config.range(),
                        timeframe = config.timeframe().code(),
                        "starting download"
                    );
                    spawn_job(Arc::clone(&state.fetcher), handle, config);
                }
                Err(busy) => lock(&handle).notify(busy.to_string()),
            }
        }
        Err(e) => {
            tracing::debug!(session = %id, error = %e, "rejected form");
            lock(&handle).notify(e.to_string());
        }
    }

    (remember(jar, id, created), Redirect::to("/")).into_response()
}

/// Spawns a download and watches it, so a task that dies without storing
/// an outcome still leaves the session in `Failed`.
fn spawn_job(fetcher: Arc<WebFetcher>, handle: SessionHandle, config: Configuration) {
    let job = tokio::spawn(run_job(fetcher, Arc::clone(&handle), config));
    tokio::spawn(async move {
        if let Err(e) = job.await {
            tracing::error!(error = %e, "download task aborted");
            lock(&handle).fail(format!("Download task aborted: {e}"));
        }
    });
}

/// Runs one download and stores its outcome in the session.
async fn run_job(fetcher: Arc<WebFetcher>, handle: SessionHandle, config: Configuration) {
    let updates = Arc::clone(&handle);
    let mut on_day = move |p: &DayProgress| lock(&updates).update(*p);

    let outcome = download(&*fetcher, &config, &mut on_day).await;

    let mut session = lock(&handle);
    match outcome {
        Ok(DownloadOutcome::Completed(done)) => {
            tracing::info!(records = done.table().len(), "download finished");
            session.store(done);
        }
        Ok(DownloadOutcome::NoData(report)) => {
            tracing::info!(symbol = %config.resolved_symbol(), "no data found");
            session.no_data(report.stats());
        }
        Err(e) => {
            tracing::warn!(error = %e, "download failed");
            session.fail(e.to_string());
        }
    }
}

/// Polling snapshot of a session.
#[derive(Debug, Default, Serialize)]
struct ProgressBody {
    status: JobStatus,
    processed: usize,
    total: usize,
    matched: usize,
    date: Option<String>,
    records: Option<usize>,
    error: Option<String>,
}

async fn progress(State(state): State<AppState>, jar: CookieJar) -> Json<ProgressBody> {
    let Some(handle) = known_session(&state, &jar).await else {
        return Json(ProgressBody::default());
    };

    let session = lock(&handle);
    let day = session.progress();
    Json(ProgressBody {
        status: session.status(),
        processed: day.map_or(0, |p| p.position),
        total: day.map_or(0, |p| p.total),
        matched: day.map_or(0, |p| p.matched),
        date: day.map(|p| p.date.format("%d-%m-%Y").to_string()),
        records: session.result().map(|d| d.table().len()),
        error: session.error().map(str::to_string),
    })
}

async fn export_csv(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(handle) = known_session(&state, &jar).await else {
        return (StatusCode::NOT_FOUND, "No data to export").into_response();
    };

    let session = lock(&handle);
    let (Some(done), Some(config)) = (session.result(), session.config()) else {
        return (StatusCode::NOT_FOUND, "No data to export").into_response();
    };

    let mut body = Vec::new();
    if let Err(e) = OutputFormat::Csv.write(done.table().records(), &mut body) {
        tracing::error!(error = %e, "csv export failed");
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    // named after the symbol in the data, as the CLI does
    let symbol = done
        .table()
        .symbol()
        .map_or_else(|| config.resolved_symbol(), str::to_string);
    let filename = download_filename(&symbol, OutputFormat::Csv);
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn reset(State(state): State<AppState>, jar: CookieJar) -> Redirect {
    if let Some(handle) = known_session(&state, &jar).await {
        let mut session = lock(&handle);
        if session.status() == JobStatus::Running {
            session.notify("A download is still running.");
        } else {
            session.clear();
        }
    }
    Redirect::to("/")
}

async fn known_session(state: &AppState, jar: &CookieJar) -> Option<SessionHandle> {
    state.sessions.get(session_id(jar)?).await
}

fn session_id(jar: &CookieJar) -> Option<SessionId> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

fn remember(jar: CookieJar, id: SessionId, created: bool) -> CookieJar {
    if !created {
        return jar;
    }
    jar.add(
        Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}
