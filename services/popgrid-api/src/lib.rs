//! popgrid API service library.
//!
//! HTTP surface over the aggregation engine: polygon totals, heatmap
//! grids, coordinate projection, plus health and metrics routes.

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod payload;
pub mod state;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>, prometheus: PrometheusHandle) -> Router {
    Router::new()
        .route("/ping", get(handlers::ping::ping_handler))
        // Queries
        .route("/api/total", post(handlers::api::total_handler))
        .route("/api/grid", post(handlers::api::grid_handler))
        .route("/api/project", post(handlers::api::project_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(Extension(prometheus))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
