//! Raster grid coordinates and dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;

/// Dimensions of a population raster, in cells.
///
/// The production raster is [`RasterDims::GLOBAL`]: 30 arc-second cells,
/// 21600 rows (north to south) by 43200 columns (west to east).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RasterDims {
    pub rows: usize,
    pub cols: usize,
}

impl RasterDims {
    /// Global 30 arc-second grid.
    pub const GLOBAL: RasterDims = RasterDims {
        rows: 21600,
        cols: 43200,
    };

    /// Create raster dimensions.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if the raster has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Index of the last valid row.
    pub fn last_row(&self) -> i64 {
        self.rows as i64 - 1
    }

    /// Index of the last valid column.
    pub fn last_col(&self) -> i64 {
        self.cols as i64 - 1
    }

    /// Cells per unit of normalized latitude (the [-1, 1] axis spans all rows).
    pub fn row_scale(&self) -> f64 {
        self.rows as f64 / 2.0
    }

    /// Cells per unit of normalized longitude (the [-2, 2] axis spans all columns).
    pub fn col_scale(&self) -> f64 {
        self.cols as f64 / 4.0
    }

    /// Check if a point addresses a cell of this raster.
    pub fn contains_cell(&self, point: GridPoint) -> bool {
        (0..self.rows as i64).contains(&point.row) && (0..self.cols as i64).contains(&point.col)
    }

    /// Check if a point is a cell corner of this raster.
    ///
    /// Corners include the far edges (`row == rows`, `col == cols`).
    pub fn contains_corner(&self, point: GridPoint) -> bool {
        (0..=self.rows as i64).contains(&point.row) && (0..=self.cols as i64).contains(&point.col)
    }

    /// Row-major offset of a cell.
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

impl Default for RasterDims {
    fn default() -> Self {
        Self::GLOBAL
    }
}

impl fmt::Display for RasterDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A position on the raster grid.
///
/// Ordering is lexicographic by `(row, col)`. When used as a polygon
/// vertex the point is the top-left corner of cell `(row, col)`; the same
/// type doubles as a 2D vector for cross products.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPoint {
    pub row: i64,
    pub col: i64,
}

impl GridPoint {
    /// Create a grid point.
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Build a point from a wire-order `[col, row]` pair.
    pub fn from_col_row(pair: [i64; 2]) -> Self {
        Self {
            row: pair[1],
            col: pair[0],
        }
    }

    /// Wire-order `[col, row]` pair.
    pub fn to_col_row(self) -> [i64; 2] {
        [self.col, self.row]
    }

    /// 2D cross product, treating `row` as x and `col` as y.
    #[inline]
    pub fn cross(self, other: GridPoint) -> i64 {
        self.row * other.col - self.col * other.row
    }
}

impl Sub for GridPoint {
    type Output = GridPoint;

    fn sub(self, rhs: GridPoint) -> GridPoint {
        GridPoint {
            row: self.row - rhs.row,
            col: self.col - rhs.col,
        }
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_dims() {
        let dims = RasterDims::GLOBAL;
        assert_eq!(dims.len(), 21600 * 43200);
        assert_eq!(dims.last_row(), 21599);
        assert_eq!(dims.last_col(), 43199);
        assert_eq!(dims.row_scale(), 10800.0);
        assert_eq!(dims.col_scale(), 10800.0);
    }

    #[test]
    fn test_cell_vs_corner_bounds() {
        let dims = RasterDims::new(6, 12);
        assert!(dims.contains_cell(GridPoint::new(5, 11)));
        assert!(!dims.contains_cell(GridPoint::new(6, 11)));
        assert!(dims.contains_corner(GridPoint::new(6, 12)));
        assert!(!dims.contains_corner(GridPoint::new(7, 0)));
        assert!(!dims.contains_corner(GridPoint::new(0, -1)));
    }

    #[test]
    fn test_cross_product_sign() {
        let a = GridPoint::new(1, 0);
        let b = GridPoint::new(0, 1);
        assert_eq!(a.cross(b), 1);
        assert_eq!(b.cross(a), -1);
        assert_eq!(a.cross(a), 0);
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut points = vec![
            GridPoint::new(2, 0),
            GridPoint::new(0, 5),
            GridPoint::new(0, 1),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![GridPoint::new(0, 1), GridPoint::new(0, 5), GridPoint::new(2, 0)]
        );
    }

    #[test]
    fn test_wire_order() {
        let p = GridPoint::from_col_row([7, 3]);
        assert_eq!(p, GridPoint::new(3, 7));
        assert_eq!(p.to_col_row(), [7, 3]);
    }
}
