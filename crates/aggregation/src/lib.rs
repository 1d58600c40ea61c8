//! Population aggregation over convex regions.
//!
//! The pipeline for a user-drawn region:
//!
//! 1. [`hull::convex_hull`] reduces the raw points to a CCW convex polygon.
//! 2. [`scanline::polygon_sum`] rasterizes the hull boundary into one
//!    column interval per raster row and sums each interval with a single
//!    prefix-sum lookup.
//! 3. [`heatmap::polygon_grid`] tiles the hull's bounding box into squares
//!    for visualization, using [`locator`] to skip squares outside the hull.
//!
//! [`query`] wraps these steps with input validation for the service layer.
//!
//! Polygon vertices are cell corners: vertex `(r, c)` is the top-left
//! corner of cell `(r, c)`, and a cell counts toward a polygon when its
//! top-left corner lies inside it but not on its bottom or right boundary.

pub mod heatmap;
pub mod hull;
pub mod locator;
pub mod query;
pub mod scanline;

pub use heatmap::{polygon_grid, suggested_grid_width, CellStrategy, HeatmapGrid, OUTSIDE};
pub use hull::{convex_hull, ConvexPolygon};
pub use locator::{contains_linear, contains_logarithmic, Locator};
pub use query::{grid_query, total_query, validate_polygon, GridOutcome, TotalOutcome};
pub use scanline::{polygon_sum, ColumnInterval, IntervalMap};
