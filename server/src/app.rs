//! Routes of the single-page search tool.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{
        Html,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use common::search::{self, DEFAULT_RESULTS_WANTED};
use common::{
    EXPORT_FILE_NAME, JobPosting, JobSource, NoProgress, Outcome, Progress, ScrapeError,
    SearchCriteria, SearchReport, SearchRequest, SearchSettings, export,
};
use futures::{Stream, stream};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::error::AppError;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Builds a fresh job source for each search.
///
/// Blocking HTTP clients must be created and dropped off the async runtime,
/// so the source is made inside the blocking task.
pub type SourceFactory =
    Arc<dyn Fn() -> Result<Box<dyn JobSource + Send>, ScrapeError> + Send + Sync>;

/// Shared application state
pub struct AppState {
    pub settings: SearchSettings,
    pub make_source: SourceFactory,
}

/// Body of `POST /api/search`
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default = "default_results_wanted")]
    pub results_wanted: usize,
}

fn default_results_wanted() -> usize {
    DEFAULT_RESULTS_WANTED
}

/// API response for a completed search
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    status: &'static str,
    message: String,
    total_scraped: usize,
    calls: usize,
    warnings: Vec<String>,
    jobs: Vec<JobPosting>,
    csv: Option<String>,
    file_name: Option<&'static str>,
}

impl SearchResponse {
    fn from_report(report: SearchReport) -> Result<Self, AppError> {
        let warnings = report
            .failures
            .iter()
            .map(|f| warning(&f.request, &f.error))
            .collect();

        let status = report.outcome.status();
        let message = report.outcome.message();
        let (jobs, csv, file_name) = match report.outcome {
            Outcome::Matches(jobs) => {
                let csv = export::to_csv_string(&jobs)?;
                (jobs, Some(csv), Some(EXPORT_FILE_NAME))
            }
            Outcome::NoMatches | Outcome::NoJobsFound => (Vec::new(), None, None),
        };

        Ok(Self {
            status,
            message,
            total_scraped: report.total_scraped,
            calls: report.calls,
            warnings,
            jobs,
            csv,
            file_name,
        })
    }
}

fn warning(request: &SearchRequest, error: &ScrapeError) -> String {
    format!(
        "Error searching for {} in {}: {}",
        request.role, request.location, error
    )
}

/// Forwards run progress as server-sent events.
struct ChannelProgress {
    events: UnboundedSender<Event>,
}

impl ChannelProgress {
    fn send<T: Serialize>(&self, name: &'static str, data: &T) {
        let event = match Event::default().event(name).json_data(data) {
            Ok(event) => event,
            Err(e) => {
                warn!("Could not encode {} event: {}", name, e);
                return;
            }
        };
        if self.events.send(event).is_err() {
            debug!("Search stream closed before the {} event", name);
        }
    }
}

impl Progress for ChannelProgress {
    fn searching(&mut self, request: &SearchRequest, current: usize, total: usize) {
        self.send(
            "progress",
            &json!({
                "current": current,
                "total": total,
                "percent": current * 100 / total.max(1),
                "message": format!(
                    "Searching for '{}' in '{}' ({current}/{total})...",
                    request.role, request.location
                ),
            }),
        );
    }

    fn failed(&mut self, request: &SearchRequest, error: &ScrapeError) {
        self.send("warning", &json!({ "message": warning(request, error) }));
    }

    fn processing(&mut self) {
        self.send("processing", &json!({ "message": "Processing results..." }));
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/search", post(search_handler))
        .route("/api/search/stream", post(search_stream_handler))
        .with_state(state)
}

fn criteria_from(form: &SearchForm) -> Result<SearchCriteria, AppError> {
    let criteria = SearchCriteria::new(&form.roles, &form.locations, form.results_wanted)?;
    info!(
        "Search requested: {} roles x {} locations, {} results each",
        criteria.roles().len(),
        criteria.locations().len(),
        criteria.results_wanted()
    );
    Ok(criteria)
}

/// Handler for GET / (root)
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handler for POST /api/search
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SearchForm>,
) -> Result<Json<SearchResponse>, AppError> {
    let criteria = criteria_from(&form)?;

    let report = tokio::task::spawn_blocking(move || -> Result<SearchReport, ScrapeError> {
        let source = (state.make_source)()?;
        Ok(search::run(
            &*source,
            &criteria,
            &state.settings,
            &mut NoProgress,
        ))
    })
    .await??;

    Ok(Json(SearchResponse::from_report(report)?))
}

/// Handler for POST /api/search/stream
///
/// Streams `progress`, `warning` and `processing` events while the search
/// runs, then one `done` event carrying the same body as `/api/search`, or
/// an `error` event. Invalid input is rejected before streaming starts.
async fn search_stream_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SearchForm>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let criteria = criteria_from(&form)?;
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        let mut progress = ChannelProgress { events: tx };
        let response = (state.make_source)()
            .map_err(AppError::from)
            .and_then(|source| {
                let report = search::run(&*source, &criteria, &state.settings, &mut progress);
                SearchResponse::from_report(report)
            });

        match response {
            Ok(response) => progress.send("done", &response),
            Err(e) => {
                error!("Streamed search failed: {}", e);
                progress.send("error", &json!({ "error": e.to_string() }));
            }
        }
    });

    // ends once the search task drops its sender
    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok(event), rx))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
