//! Scanline aggregation of a convex polygon over the prefix-summed raster.
//!
//! Every hull edge is rasterized into an [`IntervalMap`] keyed by raster
//! row. For a convex polygon the boundary crossings on one row bound a
//! single contiguous run of columns, so each row costs one
//! [`RasterStore::range_sum`] call regardless of how wide the run is.

use std::collections::BTreeMap;
use std::ops::Range;

use popgrid_common::GridPoint;
use raster_store::RasterStore;

use crate::hull::ConvexPolygon;

/// Min/max column corner seen on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInterval {
    pub lo: i64,
    pub hi: i64,
}

impl ColumnInterval {
    fn widen(&mut self, col: i64) {
        self.lo = self.lo.min(col);
        self.hi = self.hi.max(col);
    }

    /// Cells whose top-left corner lies in `[lo, hi)`, as an inclusive
    /// column range; `None` when the run is empty.
    pub fn cells(&self) -> Option<(i64, i64)> {
        if self.hi > self.lo {
            Some((self.lo, self.hi - 1))
        } else {
            None
        }
    }
}

/// Per-row column extents of a rasterized polygon boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalMap {
    rows: BTreeMap<i64, ColumnInterval>,
}

impl IntervalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rasterize every edge of a polygon, wrapping from last to first.
    pub fn from_polygon(polygon: &ConvexPolygon) -> Self {
        let mut map = Self::new();
        for (a, b) in polygon.edges() {
            map.add_edge(a, b);
        }
        map
    }

    /// Widen the interval of `row` to include `col`.
    pub fn record(&mut self, row: i64, col: i64) {
        self.rows
            .entry(row)
            .and_modify(|interval| interval.widen(col))
            .or_insert(ColumnInterval { lo: col, hi: col });
    }

    /// Record the boundary corners of one edge on every row it spans.
    ///
    /// On a sloped edge the column recorded at row `r` is the exact line
    /// position rounded up, so a cell is inside when its top-left corner
    /// is on or right of the left boundary and strictly left of the right one.
    pub fn add_edge(&mut self, a: GridPoint, b: GridPoint) {
        let (top, bottom) = if a.row <= b.row { (a, b) } else { (b, a) };

        if top.row == bottom.row {
            self.record(top.row, top.col);
            self.record(bottom.row, bottom.col);
            return;
        }

        if top.col == bottom.col {
            for row in top.row..=bottom.row {
                self.record(row, top.col);
            }
            return;
        }

        let dr = bottom.row - top.row;
        let dc = bottom.col - top.col;
        for row in top.row..=bottom.row {
            let col = top.col + div_ceil((row - top.row) * dc, dr);
            self.record(row, col);
        }
    }

    pub fn get(&self, row: i64) -> Option<ColumnInterval> {
        self.rows.get(&row).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows with at least one covered cell and their inclusive column runs.
    ///
    /// The bottom-most row is the polygon's lower boundary and never
    /// contributes cells.
    pub fn covered(&self) -> impl Iterator<Item = (i64, i64, i64)> + '_ {
        self.covered_rows(i64::MIN..i64::MAX)
    }

    /// [`covered`](Self::covered) restricted to rows in `rows`.
    pub fn covered_rows(&self, rows: Range<i64>) -> impl Iterator<Item = (i64, i64, i64)> + '_ {
        let last = self.rows.keys().next_back().copied();
        self.rows
            .range(rows)
            .filter(move |(row, _)| Some(**row) != last)
            .filter_map(|(row, interval)| interval.cells().map(|(lo, hi)| (*row, lo, hi)))
    }
}

/// `ceil(numerator / denominator)` for a positive denominator.
#[inline]
fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    let q = numerator / denominator;
    if numerator % denominator > 0 {
        q + 1
    } else {
        q
    }
}

/// Total raster value of the cells covered by a convex polygon.
///
/// The polygon must have at least three vertices; degenerate polygons
/// cover no cells and sum to zero.
pub fn polygon_sum(polygon: &ConvexPolygon, store: &RasterStore) -> f64 {
    IntervalMap::from_polygon(polygon)
        .covered()
        .map(|(row, lo, hi)| store.range_sum(row, lo, hi))
        .sum()
}
