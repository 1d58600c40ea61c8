//! Request and response bodies for the query routes.
//!
//! Polygons arrive as a GeoJSON-like geometry whose first ring holds
//! `[col, row]` pairs of raster-grid corners.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aggregation::{GridOutcome, TotalOutcome};
use popgrid_common::{GridPoint, PopError};
use projection::ProjectionKind;

/// Problems with a request body, before any query runs.
#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("geometry has no rings")]
    EmptyGeometry,
}

impl From<PayloadError> for PopError {
    fn from(err: PayloadError) -> Self {
        PopError::MalformedInput(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Option<Vec<Vec<[i64; 2]>>>,
}

#[derive(Debug, Deserialize)]
struct RawPolygonRequest {
    geometry: Option<RawGeometry>,
    grid_width: Option<i64>,
}

/// A validated-shape polygon request.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRequest {
    pub points: Vec<GridPoint>,
    pub grid_width: Option<i64>,
}

/// Parse the body of `/api/total` and `/api/grid`.
///
/// Only the shape of the body is checked here; point counts, ranges and
/// widths are validated by the query layer.
pub fn parse_polygon_request(body: &[u8]) -> Result<PolygonRequest, PayloadError> {
    let raw: RawPolygonRequest =
        serde_json::from_slice(body).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;

    let geometry = raw.geometry.ok_or(PayloadError::MissingField("geometry"))?;
    let rings = geometry
        .coordinates
        .ok_or(PayloadError::MissingField("geometry.coordinates"))?;
    let ring = rings.into_iter().next().ok_or(PayloadError::EmptyGeometry)?;

    Ok(PolygonRequest {
        points: ring.into_iter().map(GridPoint::from_col_row).collect(),
        grid_width: raw.grid_width,
    })
}

/// Body of `/api/project`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRequest {
    /// `[lon, lat]` pairs in degrees.
    pub points: Vec<[f64; 2]>,

    /// `linear` or `mollweide`; the service default when absent.
    pub projection: Option<String>,
}

impl ProjectRequest {
    pub fn parse(body: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(body).map_err(|e| PayloadError::InvalidJson(e.to_string()))
    }

    /// Requested projection, falling back to `default`.
    pub fn projection_kind(&self, default: ProjectionKind) -> Result<ProjectionKind, PopError> {
        match &self.projection {
            Some(name) => Ok(name.parse()?),
            None => Ok(default),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub hull: Vec<[i64; 2]>,
    pub population: f64,
}

impl From<TotalOutcome> for TotalResponse {
    fn from(outcome: TotalOutcome) -> Self {
        Self {
            hull: wire_points(outcome.hull.vertices()),
            population: outcome.population,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub grid: Vec<Vec<f64>>,
    pub grid_width: i64,
}

impl From<GridOutcome> for GridResponse {
    fn from(outcome: GridOutcome) -> Self {
        Self {
            grid: outcome.grid.to_nested(),
            grid_width: outcome.grid_width,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub projection: ProjectionKind,
    pub points: Vec<[i64; 2]>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&PopError> for ErrorResponse {
    fn from(err: &PopError) -> Self {
        Self {
            error: err.to_string(),
            code: err.error_code().to_string(),
        }
    }
}

fn wire_points(points: &[GridPoint]) -> Vec<[i64; 2]> {
    points.iter().map(|p| p.to_col_row()).collect()
}
