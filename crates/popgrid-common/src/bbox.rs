//! Bounding boxes in grid space.

use serde::{Deserialize, Serialize};

use crate::grid::GridPoint;

/// An axis-aligned, inclusive bounding box of grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_row: i64,
    pub min_col: i64,
    pub max_row: i64,
    pub max_col: i64,
}

impl GridBounds {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_row: i64, min_col: i64, max_row: i64, max_col: i64) -> Self {
        Self {
            min_row,
            min_col,
            max_row,
            max_col,
        }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GridPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first.row, first.col, first.row, first.col);
        for p in iter {
            bounds.min_row = bounds.min_row.min(p.row);
            bounds.min_col = bounds.min_col.min(p.col);
            bounds.max_row = bounds.max_row.max(p.row);
            bounds.max_col = bounds.max_col.max(p.col);
        }
        Some(bounds)
    }

    /// Extent along the row axis.
    pub fn height(&self) -> i64 {
        self.max_row - self.min_row
    }

    /// Extent along the column axis.
    pub fn width(&self) -> i64 {
        self.max_col - self.min_col
    }

    /// The longer of the two extents.
    pub fn longest_side(&self) -> i64 {
        self.height().max(self.width())
    }

    /// Check if a point is contained within this box (inclusive).
    pub fn contains(&self, point: GridPoint) -> bool {
        point.row >= self.min_row
            && point.row <= self.max_row
            && point.col >= self.min_col
            && point.col <= self.max_col
    }
}
