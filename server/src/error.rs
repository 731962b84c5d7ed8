use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{ExportError, ScrapeError, SearchError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors a request handler can end with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidInput(#[from] SearchError),
    #[error("could not set up job boards: {0}")]
    Source(#[from] ScrapeError),
    #[error("search task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("could not export results: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => {
                error!("{}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
