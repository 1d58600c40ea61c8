//! Validated entry points for total and grid queries.

use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use popgrid_common::{GridPoint, PopError, PopResult, RasterDims};
use raster_store::RasterStore;

use crate::heatmap::{grid_shape, polygon_grid, suggested_grid_width, CellStrategy, HeatmapGrid};
use crate::hull::{convex_hull, ConvexPolygon};
use crate::scanline::polygon_sum;

/// Minimum number of points for an area query.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Result of a total query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalOutcome {
    pub hull: ConvexPolygon,
    pub population: f64,
}

/// Result of a grid query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridOutcome {
    pub hull: ConvexPolygon,
    pub grid: HeatmapGrid,
    pub grid_width: i64,
}

/// Check caller points and reduce them to an area-enclosing hull.
///
/// Points are cell corners and may lie on the far edges of the raster.
/// Fails with `InsufficientPoints` for fewer than three points or when the
/// hull collapses to a line or a point.
pub fn validate_polygon(points: &[GridPoint], dims: RasterDims) -> PopResult<ConvexPolygon> {
    if points.len() < MIN_POLYGON_POINTS {
        return Err(PopError::InsufficientPoints {
            got: points.len(),
            required: MIN_POLYGON_POINTS,
        });
    }

    if let Some(bad) = points.iter().find(|p| !dims.contains_corner(**p)) {
        return Err(PopError::out_of_range(format!(
            "point {} outside raster {} (rows 0..={}, cols 0..={})",
            bad, dims, dims.rows, dims.cols
        )));
    }

    let hull = convex_hull(points);
    if !hull.is_area_polygon() {
        return Err(PopError::InsufficientPoints {
            got: hull.len(),
            required: MIN_POLYGON_POINTS,
        });
    }
    Ok(hull)
}

/// Population inside the convex hull of `points`.
pub fn total_query(points: &[GridPoint], store: &RasterStore) -> PopResult<TotalOutcome> {
    let start = Instant::now();
    let hull = validate_polygon(points, store.dims())?;
    let population = polygon_sum(&hull, store);

    debug!(
        points = points.len(),
        hull_vertices = hull.len(),
        population = population,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Total query"
    );
    Ok(TotalOutcome { hull, population })
}

/// Heatmap of the convex hull of `points`.
///
/// `width` defaults to [`suggested_grid_width`]. Requests producing more
/// than `max_cells` heatmap cells fail with `GridTooLarge`.
pub fn grid_query(
    points: &[GridPoint],
    width: Option<i64>,
    store: &RasterStore,
    strategy: CellStrategy,
    max_cells: u64,
) -> PopResult<GridOutcome> {
    if let Some(w) = width {
        if w < 1 {
            return Err(PopError::InvalidWidth(w));
        }
    }

    let start = Instant::now();
    let hull = validate_polygon(points, store.dims())?;
    let grid_width = width.unwrap_or_else(|| suggested_grid_width(&hull));

    let bounds = hull
        .bounds()
        .ok_or_else(|| PopError::Internal("validated hull has no bounds".to_string()))?;
    let (rows, cols) = grid_shape(&bounds, grid_width);
    let cells = rows as u64 * cols as u64;
    if cells > max_cells {
        return Err(PopError::GridTooLarge {
            cells,
            limit: max_cells,
        });
    }

    let grid = polygon_grid(&hull, grid_width, store, strategy);
    debug!(
        points = points.len(),
        grid_width = grid_width,
        cells = cells,
        strategy = %strategy,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Grid query"
    );
    Ok(GridOutcome {
        hull,
        grid,
        grid_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{create_constant_grid, square_corners};

    fn ones(rows: usize, cols: usize) -> RasterStore {
        RasterStore::from_values(
            RasterDims::new(rows, cols),
            create_constant_grid(rows, cols, 1.0),
            -9999.0,
        )
        .unwrap()
    }

    #[test]
    fn test_too_few_points() {
        let store = ones(20, 40);
        let err = total_query(&[GridPoint::new(0, 0), GridPoint::new(1, 1)], &store).unwrap_err();
        assert_eq!(err, PopError::InsufficientPoints { got: 2, required: 3 });
    }

    #[test]
    fn test_collinear_points_rejected() {
        let store = ones(20, 40);
        let line = [GridPoint::new(0, 0), GridPoint::new(1, 1), GridPoint::new(2, 2)];
        let err = total_query(&line, &store).unwrap_err();
        assert_eq!(err, PopError::InsufficientPoints { got: 2, required: 3 });
    }

    #[test]
    fn test_out_of_range_points() {
        let store = ones(20, 40);
        let points = [GridPoint::new(0, 0), GridPoint::new(21, 0), GridPoint::new(0, 5)];
        let err = total_query(&points, &store).unwrap_err();
        assert_eq!(err.error_code(), "RangeError");

        // Far edges are valid corners
        let points = [GridPoint::new(0, 0), GridPoint::new(20, 0), GridPoint::new(20, 40)];
        assert!(total_query(&points, &store).is_ok());
    }

    #[test]
    fn test_total_query() {
        let store = ones(20, 40);
        let outcome = total_query(&square_corners(0, 0, 10), &store).unwrap();
        assert_eq!(outcome.population, 100.0);
        assert_eq!(outcome.hull.len(), 4);
    }

    #[test]
    fn test_grid_query_width_validation() {
        let store = ones(20, 40);
        let square = square_corners(0, 0, 10);

        for width in [0, -3] {
            let err = grid_query(&square, Some(width), &store, CellStrategy::FullCell, 1000)
                .unwrap_err();
            assert_eq!(err, PopError::InvalidWidth(width));
        }
    }

    #[test]
    fn test_grid_query_default_width() {
        let store = ones(20, 40);
        let outcome =
            grid_query(&square_corners(0, 0, 10), None, &store, CellStrategy::FullCell, 1000)
                .unwrap();
        // longest side 10 -> 3 cells across -> width 3
        assert_eq!(outcome.grid_width, 3);
        assert_eq!((outcome.grid.rows(), outcome.grid.cols()), (4, 4));
    }

    #[test]
    fn test_grid_query_limit() {
        let store = ones(20, 40);
        let err = grid_query(
            &square_corners(0, 0, 20),
            Some(1),
            &store,
            CellStrategy::FullCell,
            100,
        )
        .unwrap_err();
        assert_eq!(err, PopError::GridTooLarge { cells: 441, limit: 100 });
        assert_eq!(err.http_status_code(), 413);
    }
}
