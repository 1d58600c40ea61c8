//! Shared projection plumbing: the normalized rectangle and strategy selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use popgrid_common::{GeoPoint, GridPoint, PopError, PopResult, RasterDims};

use crate::linear::LinearProjection;
use crate::mollweide::Mollweide;

/// A bidirectional mapping between the globe and raster cells.
pub trait GridProjection: Send + Sync {
    /// Short identifier used in logs and API payloads.
    fn name(&self) -> &'static str;

    /// Project a geographic point onto the grid.
    fn forward(&self, geo: GeoPoint) -> PopResult<GridPoint>;

    /// Recover the geographic point of a grid position.
    fn inverse(&self, point: GridPoint) -> PopResult<GeoPoint>;
}

/// Map a point of the normalized rectangle onto the grid.
///
/// `x` spans `[-2, 2]` west to east and `y` spans `[-1, 1]` south to north.
/// Row 0 is the northern edge. The far edges round onto `rows`/`cols` and
/// are clamped back to the last cell so the result is always a valid cell.
pub fn grid_from_normalized(x: f64, y: f64, dims: RasterDims) -> PopResult<GridPoint> {
    if !(-2.0..=2.0).contains(&x) {
        return Err(PopError::out_of_range(format!(
            "normalized x {} not in [-2, 2]",
            x
        )));
    }
    if !(-1.0..=1.0).contains(&y) {
        return Err(PopError::out_of_range(format!(
            "normalized y {} not in [-1, 1]",
            y
        )));
    }

    let row = ((1.0 - y) * dims.row_scale()).round() as i64;
    let col = ((x + 2.0) * dims.col_scale()).round() as i64;

    Ok(GridPoint::new(
        row.min(dims.last_row()),
        col.min(dims.last_col()),
    ))
}

/// Normalized `(x, y)` of a grid position; exact inverse of the affine step
/// in [`grid_from_normalized`] before rounding.
pub fn normalized_from_grid(point: GridPoint, dims: RasterDims) -> (f64, f64) {
    let x = point.col as f64 / dims.col_scale() - 2.0;
    let y = 1.0 - point.row as f64 / dims.row_scale();
    (x, y)
}

/// Selectable projection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    /// Linear rescale (live query path).
    #[default]
    Linear,
    /// Equal-area Mollweide.
    Mollweide,
}

impl ProjectionKind {
    /// Get the projection name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Mollweide => "mollweide",
        }
    }

    /// Instantiate the projection for a raster.
    pub fn build(self, dims: RasterDims) -> Box<dyn GridProjection> {
        match self {
            Self::Linear => Box::new(LinearProjection::new(dims)),
            Self::Mollweide => Box::new(Mollweide::new(dims, Default::default())),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a projection name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown projection '{0}', expected 'linear' or 'mollweide'")]
pub struct UnknownProjection(pub String);

impl From<UnknownProjection> for PopError {
    fn from(err: UnknownProjection) -> Self {
        PopError::MalformedInput(err.to_string())
    }
}

impl FromStr for ProjectionKind {
    type Err = UnknownProjection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" | "equirectangular" => Ok(Self::Linear),
            "mollweide" => Ok(Self::Mollweide),
            _ => Err(UnknownProjection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLOBAL: RasterDims = RasterDims::GLOBAL;

    #[test]
    fn test_normalized_center() {
        let p = grid_from_normalized(0.0, 0.0, GLOBAL).unwrap();
        assert_eq!(p, GridPoint::new(10800, 21600));
    }

    #[test]
    fn test_normalized_corners_clamped() {
        let p = grid_from_normalized(1.0, 1.0, GLOBAL).unwrap();
        assert_eq!(p, GridPoint::new(0, 32400));

        let p = grid_from_normalized(-1.0, -1.0, GLOBAL).unwrap();
        assert_eq!(p, GridPoint::new(21599, 10800));

        let p = grid_from_normalized(2.0, -1.0, GLOBAL).unwrap();
        assert_eq!(p, GridPoint::new(21599, 43199));

        let p = grid_from_normalized(-2.0, 1.0, GLOBAL).unwrap();
        assert_eq!(p, GridPoint::new(0, 0));
    }

    #[test]
    fn test_normalized_rejects_marginal_overflow() {
        assert!(grid_from_normalized(2.0 + 1e-9, 0.0, GLOBAL).is_err());
        assert!(grid_from_normalized(-2.0 - 1e-9, 0.0, GLOBAL).is_err());
        assert!(grid_from_normalized(0.0, 1.0 + 1e-9, GLOBAL).is_err());
        assert!(grid_from_normalized(0.0, -1.0 - 1e-9, GLOBAL).is_err());
        assert!(grid_from_normalized(f64::NAN, 0.0, GLOBAL).is_err());
    }

    #[test]
    fn test_normalized_from_grid_inverts_affine() {
        let (x, y) = normalized_from_grid(GridPoint::new(10800, 21600), GLOBAL);
        assert_eq!((x, y), (0.0, 0.0));

        let (x, y) = normalized_from_grid(GridPoint::new(21600, 43200), GLOBAL);
        assert_eq!((x, y), (2.0, -1.0));
    }

    #[test]
    fn test_projection_kind_parsing() {
        assert_eq!("linear".parse::<ProjectionKind>().unwrap(), ProjectionKind::Linear);
        assert_eq!(
            " Mollweide ".parse::<ProjectionKind>().unwrap(),
            ProjectionKind::Mollweide
        );
        let err = "mercator".parse::<ProjectionKind>().unwrap_err();
        assert!(matches!(PopError::from(err), PopError::MalformedInput(_)));
    }

    #[test]
    fn test_projection_kind_builds_named_projection() {
        assert_eq!(ProjectionKind::Linear.build(GLOBAL).name(), "linear");
        assert_eq!(ProjectionKind::Mollweide.build(GLOBAL).name(), "mollweide");
    }
}
