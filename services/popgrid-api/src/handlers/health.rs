//! Health and metrics handlers.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub total_population: f64,
    pub rows: usize,
    pub cols: usize,
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Readiness check (the snapshot is loaded before the listener
/// binds, so a reachable service always has data)
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Json<ReadyResponse> {
    let dims = state.store.dims();
    Json(ReadyResponse {
        ready: !dims.is_empty(),
        total_population: state.store.total(),
        rows: dims.rows,
        cols: dims.cols,
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use raster_store::RasterStore;
    use test_utils::{create_constant_grid, dims, NODATA};

    use crate::config::ServiceConfig;

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn test_ready_reports_store() {
        let store = RasterStore::from_values(
            dims::SMALL,
            create_constant_grid(dims::SMALL.rows, dims::SMALL.cols, 2.0),
            NODATA,
        )
        .unwrap();
        let state = Arc::new(AppState::new(store, ServiceConfig::default()));

        let response = ready_handler(Extension(state)).await;
        assert!(response.ready);
        assert_eq!(response.total_population, 1600.0);
        assert_eq!((response.rows, response.cols), (20, 40));
    }

    #[tokio::test]
    async fn test_metrics_content_type() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let response = metrics_handler(Extension(handle)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
