//! Heatmap decomposition of a convex polygon into square cells.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use popgrid_common::{GridBounds, GridPoint};
use raster_store::RasterStore;

use crate::hull::{convex_hull, ConvexPolygon};
use crate::locator::contains_logarithmic;
use crate::scanline::{polygon_sum, IntervalMap};

/// Value of a heatmap cell that does not touch the polygon.
pub const OUTSIDE: f64 = -1.0;

/// Upper bound on heatmap cells along the longer side of a region.
pub const MAX_CELLS_PER_SIDE: i64 = 100;

/// How a relevant heatmap cell is valued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStrategy {
    /// Sum the whole square, even the part outside the polygon.
    #[default]
    FullCell,
    /// Sum only the part of the square inside the polygon.
    Clipped,
}

impl CellStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullCell => "fullcell",
            Self::Clipped => "clipped",
        }
    }
}

impl fmt::Display for CellStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CellStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(|c: char| c == '-' || c == '_', "").as_str() {
            "fullcell" | "full" => Ok(Self::FullCell),
            "clipped" | "clip" => Ok(Self::Clipped),
            other => Err(format!("unknown cell strategy '{}'", other)),
        }
    }
}

/// Row-major matrix of heatmap cell values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl HeatmapGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of cells that touch the polygon.
    pub fn relevant_cells(&self) -> usize {
        self.values.iter().filter(|&&v| v != OUTSIDE).count()
    }

    /// Sum of all relevant cells.
    pub fn relevant_sum(&self) -> f64 {
        self.values.iter().filter(|&&v| v != OUTSIDE).sum()
    }

    /// One `Vec` per heatmap row, for JSON responses.
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.cols.max(1))
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Number of heatmap rows and columns for a bounding box and step width.
///
/// Cells start at every multiple of `width` from the box minimum up to and
/// including the box maximum.
pub fn grid_shape(bounds: &GridBounds, width: i64) -> (usize, usize) {
    let width = width.max(1);
    (
        (bounds.height() / width + 1) as usize,
        (bounds.width() / width + 1) as usize,
    )
}

/// Step width giving at most [`MAX_CELLS_PER_SIDE`] cells on the longer side.
///
/// Regions narrower than 3 cells get width 1.
pub fn suggested_grid_width(polygon: &ConvexPolygon) -> i64 {
    let Some(bounds) = polygon.bounds() else {
        return 1;
    };
    let count = (bounds.longest_side() / 3).min(MAX_CELLS_PER_SIDE).max(1);
    (bounds.width() / count).max(1)
}

/// Decompose a polygon's bounding box into `width`-sized squares.
///
/// A square is relevant when any of its four corners lies inside
/// `polygon`; irrelevant squares hold [`OUTSIDE`]. Corner tests are cached
/// for the duration of the call since neighbouring squares share corners.
/// `polygon` must have at least three vertices and `width` must be positive.
pub fn polygon_grid(
    polygon: &ConvexPolygon,
    width: i64,
    store: &RasterStore,
    strategy: CellStrategy,
) -> HeatmapGrid {
    let Some(bounds) = polygon.bounds() else {
        return HeatmapGrid {
            rows: 0,
            cols: 0,
            values: Vec::new(),
        };
    };
    let width = width.max(1);
    let (rows, cols) = grid_shape(&bounds, width);

    let spans = match strategy {
        CellStrategy::Clipped => Some(IntervalMap::from_polygon(polygon)),
        CellStrategy::FullCell => None,
    };

    let mut cache: HashMap<GridPoint, bool> = HashMap::new();
    let mut values = Vec::with_capacity(rows * cols);

    for i in 0..rows as i64 {
        let top = bounds.min_row + i * width;
        for j in 0..cols as i64 {
            let left = bounds.min_col + j * width;
            let corners = [
                GridPoint::new(top, left),
                GridPoint::new(top + width, left),
                GridPoint::new(top, left + width),
                GridPoint::new(top + width, left + width),
            ];

            let relevant = corners.iter().any(|corner| {
                *cache
                    .entry(*corner)
                    .or_insert_with(|| contains_logarithmic(*corner, polygon.vertices()))
            });

            let value = if !relevant {
                OUTSIDE
            } else if let Some(spans) = &spans {
                clipped_sum(spans, top, left, width, store)
            } else {
                polygon_sum(&convex_hull(&corners), store)
            };
            values.push(value);
        }
    }

    let grid = HeatmapGrid { rows, cols, values };
    debug!(
        rows = rows,
        cols = cols,
        width = width,
        strategy = %strategy,
        relevant = grid.relevant_cells(),
        corner_tests = cache.len(),
        "Built heatmap grid"
    );
    grid
}

/// Sum of the cells of one square that the polygon also covers.
fn clipped_sum(spans: &IntervalMap, top: i64, left: i64, width: i64, store: &RasterStore) -> f64 {
    let right = left + width - 1;
    spans
        .covered_rows(top..top + width)
        .map(|(row, lo, hi)| store.range_sum(row, lo.max(left), hi.min(right)))
        .sum()
}
