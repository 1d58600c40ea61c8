//! Query handlers: polygon totals, heatmap grids and projection.

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

use aggregation::{grid_query, total_query};
use popgrid_common::{GeoPoint, PopResult};

use super::{error_response, run_blocking};
use crate::metrics::{record_query, Endpoint, Timer};
use crate::payload::{
    parse_polygon_request, GridResponse, ProjectRequest, ProjectResponse, TotalResponse,
};
use crate::state::AppState;

/// POST /api/total
pub async fn total_handler(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    let timer = Timer::start();
    let result = total(&state, &body).await;
    record_query(Endpoint::Total, &timer, &result);

    match result {
        Ok(response) => {
            info!(
                population = response.population,
                hull_vertices = response.hull.len(),
                elapsed_us = timer.elapsed_us(),
                "/api/total"
            );
            Json(response).into_response()
        }
        Err(e) => {
            warn!(error = %e, "/api/total rejected");
            error_response(&e)
        }
    }
}

async fn total(state: &AppState, body: &[u8]) -> PopResult<TotalResponse> {
    let request = parse_polygon_request(body)?;
    let store = Arc::clone(&state.store);
    let outcome = run_blocking(move || total_query(&request.points, &store)).await?;
    Ok(outcome.into())
}

/// POST /api/grid
pub async fn grid_handler(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    let timer = Timer::start();
    let result = grid(&state, &body).await;
    record_query(Endpoint::Grid, &timer, &result);

    match result {
        Ok(response) => {
            info!(
                rows = response.grid.len(),
                grid_width = response.grid_width,
                elapsed_us = timer.elapsed_us(),
                "/api/grid"
            );
            Json(response).into_response()
        }
        Err(e) => {
            warn!(error = %e, "/api/grid rejected");
            error_response(&e)
        }
    }
}

async fn grid(state: &AppState, body: &[u8]) -> PopResult<GridResponse> {
    let request = parse_polygon_request(body)?;
    let store = Arc::clone(&state.store);
    let strategy = state.config.cell_strategy;
    let max_cells = state.config.max_grid_cells;

    let outcome = run_blocking(move || {
        grid_query(
            &request.points,
            request.grid_width,
            &store,
            strategy,
            max_cells,
        )
    })
    .await?;
    Ok(outcome.into())
}

/// POST /api/project
pub async fn project_handler(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    let timer = Timer::start();
    let result = project(&state, &body);
    record_query(Endpoint::Project, &timer, &result);

    match result {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            warn!(error = %e, "/api/project rejected");
            error_response(&e)
        }
    }
}

fn project(state: &AppState, body: &[u8]) -> PopResult<ProjectResponse> {
    let request = ProjectRequest::parse(body)?;
    let kind = request.projection_kind(state.config.projection)?;
    let projector = kind.build(state.store.dims());

    let points = request
        .points
        .iter()
        .map(|[lon, lat]| -> PopResult<[i64; 2]> {
            let geo = GeoPoint::from_degrees(*lon, *lat)?;
            Ok(projector.forward(geo)?.to_col_row())
        })
        .collect::<PopResult<Vec<_>>>()?;

    Ok(ProjectResponse {
        projection: kind,
        points,
    })
}
