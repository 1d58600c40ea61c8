//! Convex hull construction (Andrew's monotone chain).

use serde::{Deserialize, Serialize};

use popgrid_common::{GridBounds, GridPoint};

/// A convex polygon in counter-clockwise order with no repeated closing
/// vertex.
///
/// Orientation treats `(row, col)` as `(x, y)`: walking the vertices, the
/// interior is on the left and [`GridPoint::cross`] of consecutive edges is
/// positive. Hulls of fewer than 3 points are degenerate and must not be
/// used for area aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvexPolygon {
    vertices: Vec<GridPoint>,
}

impl ConvexPolygon {
    pub fn vertices(&self) -> &[GridPoint] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether the polygon encloses area and may be aggregated.
    pub fn is_area_polygon(&self) -> bool {
        self.vertices.len() >= 3
    }

    /// Consecutive vertex pairs, wrapping from the last vertex to the first.
    pub fn edges(&self) -> impl Iterator<Item = (GridPoint, GridPoint)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Axis-aligned bounds of the vertices.
    pub fn bounds(&self) -> Option<GridBounds> {
        GridBounds::from_points(&self.vertices)
    }

    /// Twice the signed area; positive for CCW order.
    pub fn doubled_area(&self) -> i64 {
        self.edges().map(|(a, b)| a.cross(b)).sum()
    }
}

/// `(b - a) x (c - b)`: positive for a left turn at `b`.
#[inline]
fn turn(a: GridPoint, b: GridPoint, c: GridPoint) -> i64 {
    (b - a).cross(c - b)
}

/// Compute the convex hull of a point set.
///
/// Points are sorted by `(row, col)` and deduplicated, then the lower chain
/// is built left to right and the upper chain right to left. Points kept by
/// the lower chain are marked used and skipped by the upper chain; the first
/// point is never marked so the upper chain closes back onto it. Collinear
/// points are dropped.
pub fn convex_hull(points: &[GridPoint]) -> ConvexPolygon {
    let mut p = points.to_vec();
    p.sort_unstable();
    p.dedup();

    if p.len() < 3 {
        return ConvexPolygon { vertices: p };
    }

    let n = p.len();
    let mut used = vec![false; n];
    let mut stack: Vec<usize> = Vec::with_capacity(n + 1);
    stack.push(0);

    for i in 1..n {
        while stack.len() > 1 && turn(p[stack[stack.len() - 2]], p[stack[stack.len() - 1]], p[i]) <= 0 {
            if let Some(j) = stack.pop() {
                used[j] = false;
            }
        }
        stack.push(i);
        used[i] = true;
    }

    let base = stack.len();
    for i in (0..n - 1).rev() {
        if used[i] {
            continue;
        }
        while stack.len() > base && turn(p[stack[stack.len() - 2]], p[stack[stack.len() - 1]], p[i]) <= 0 {
            if let Some(j) = stack.pop() {
                used[j] = false;
            }
        }
        stack.push(i);
        used[i] = true;
    }

    // The upper chain ends on the starting point
    if stack.len() > 1 && stack.last() == stack.first() {
        stack.pop();
    }

    ConvexPolygon {
        vertices: stack.into_iter().map(|i| p[i]).collect(),
    }
}
