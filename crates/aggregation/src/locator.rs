//! Point-in-convex-polygon tests.
//!
//! Both variants expect a convex polygon in CCW order and count boundary
//! points as inside. They agree on every point for polygons of three or
//! more vertices.

use serde::{Deserialize, Serialize};

use popgrid_common::GridPoint;

use crate::hull::ConvexPolygon;

/// Which containment test to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    /// O(n) scan of every edge.
    Linear,
    /// O(log n) binary search over the fan around the first vertex.
    #[default]
    Logarithmic,
}

impl Locator {
    pub fn contains(self, point: GridPoint, polygon: &ConvexPolygon) -> bool {
        match self {
            Self::Linear => contains_linear(point, polygon.vertices()),
            Self::Logarithmic => contains_logarithmic(point, polygon.vertices()),
        }
    }
}

/// Inside iff `point` is on the left of (or on) every edge, wrapping.
pub fn contains_linear(point: GridPoint, polygon: &[GridPoint]) -> bool {
    let n = polygon.len();
    (0..n).all(|i| (polygon[i] - point).cross(polygon[(i + 1) % n] - point) >= 0)
}

/// Binary search for the fan sector around `polygon[0]` containing `point`,
/// then a single edge test against that sector's outer edge.
///
/// Points outside the angle spanned at `polygon[0]` are rejected before the
/// search. A one-vertex polygon contains only its vertex.
pub fn contains_logarithmic(point: GridPoint, polygon: &[GridPoint]) -> bool {
    let n = polygon.len();
    if n == 0 {
        return false;
    }

    let origin = polygon[0];
    let offset = point - origin;
    if n == 1 {
        return offset == GridPoint::new(0, 0);
    }

    if (polygon[1] - origin).cross(offset) < 0 || (polygon[n - 1] - origin).cross(offset) > 0 {
        return false;
    }

    let (mut lb, mut rb) = (0, n - 1);
    while rb - lb > 1 {
        let mid = (lb + rb) / 2;
        if (polygon[mid] - origin).cross(offset) >= 0 {
            lb = mid;
        } else {
            rb = mid;
        }
    }

    (polygon[lb] - point).cross(polygon[rb] - point) >= 0
}
