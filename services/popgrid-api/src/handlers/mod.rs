//! HTTP request handlers for the popgrid API.

pub mod api;
pub mod health;
pub mod ping;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use popgrid_common::{PopError, PopResult};

use crate::payload::ErrorResponse;

/// JSON error body with the status matching the error kind.
pub fn error_response(err: &PopError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

/// Run a CPU-bound query on the blocking pool.
pub async fn run_blocking<T, F>(f: F) -> PopResult<T>
where
    F: FnOnce() -> PopResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PopError::Internal(format!("query task failed: {}", e)))?
}
