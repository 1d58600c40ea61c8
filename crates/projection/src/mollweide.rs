//! Mollweide equal-area projection.
//!
//! The globe maps onto an ellipse inscribed in the normalized rectangle
//! `[-2, 2] x [-1, 1]`:
//!
//! ```text
//! 2θ + sin(2θ) = π sin(φ)
//! x = (2/π) λ cos(θ)
//! y = sin(θ)
//! ```
//!
//! The auxiliary angle θ has no closed form; [`ThetaSolver`] picks between
//! a fixed-count Newton iteration and a bisection on `2θ`.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use popgrid_common::{GeoPoint, GridPoint, PopError, PopResult, RasterDims};

use crate::transform::{grid_from_normalized, normalized_from_grid, GridProjection};

/// Newton iterations for the auxiliary angle.
pub const NEWTON_ITERATIONS: usize = 10;

/// Bisection stops once the bracket on `2θ` is narrower than this.
pub const BISECTION_TOLERANCE: f64 = 1e-8;

/// Strategy for solving `2θ + sin(2θ) = π sin(φ)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThetaSolver {
    /// Fixed iteration count seeded at θ = φ.
    #[default]
    Newton,
    /// Bracketed search over `2θ ∈ [-π, π]`.
    Bisection,
}

impl ThetaSolver {
    /// Solve for θ given latitude φ (radians).
    pub fn solve(self, latitude: f64) -> f64 {
        if latitude.abs() >= FRAC_PI_2 {
            return latitude.signum() * FRAC_PI_2;
        }

        let target = PI * latitude.sin();
        match self {
            Self::Newton => {
                let mut theta = latitude;
                for _ in 0..NEWTON_ITERATIONS {
                    let derivative = 2.0 + 2.0 * (2.0 * theta).cos();
                    if derivative == 0.0 {
                        break;
                    }
                    theta -= (2.0 * theta + (2.0 * theta).sin() - target) / derivative;
                }
                theta
            }
            Self::Bisection => {
                // t + sin(t) is monotonic on [-π, π], with t = 2θ
                let (mut lb, mut rb) = (-PI, PI);
                while rb - lb > BISECTION_TOLERANCE {
                    let mid = (lb + rb) / 2.0;
                    if mid + mid.sin() < target {
                        lb = mid;
                    } else {
                        rb = mid;
                    }
                }
                (lb + rb) / 4.0
            }
        }
    }
}

/// Mollweide projection onto a raster.
#[derive(Debug, Clone, Copy)]
pub struct Mollweide {
    dims: RasterDims,
    solver: ThetaSolver,
}

impl Mollweide {
    pub fn new(dims: RasterDims, solver: ThetaSolver) -> Self {
        Self { dims, solver }
    }

    pub fn solver(&self) -> ThetaSolver {
        self.solver
    }

    /// Normalized `(x, y)` on the ellipse for a geographic point.
    pub fn normalize(&self, geo: GeoPoint) -> (f64, f64) {
        if geo.latitude.abs() >= FRAC_PI_2 {
            return (0.0, geo.latitude.signum());
        }

        let theta = self.solver.solve(geo.latitude);
        let x = (2.0 / PI) * geo.longitude * theta.cos();
        (x.clamp(-2.0, 2.0), theta.sin().clamp(-1.0, 1.0))
    }

    /// Geographic point for a normalized `(x, y)` on the ellipse.
    pub fn denormalize(&self, x: f64, y: f64) -> PopResult<GeoPoint> {
        if !(-1.0..=1.0).contains(&y) {
            return Err(PopError::out_of_range(format!(
                "normalized y {} not in [-1, 1]",
                y
            )));
        }

        let theta = y.asin();
        let cos_theta = theta.cos();
        let longitude = if cos_theta.abs() < f64::EPSILON {
            0.0
        } else {
            PI * x / (2.0 * cos_theta)
        };

        // Slack of one ulp-scale step keeps the ellipse edge itself valid
        if longitude.abs() > PI + 1e-12 {
            return Err(PopError::out_of_range(format!(
                "point ({}, {}) lies outside the Mollweide ellipse",
                x, y
            )));
        }

        let sin_lat = ((2.0 * theta + (2.0 * theta).sin()) / PI).clamp(-1.0, 1.0);
        GeoPoint::from_radians(longitude.clamp(-PI, PI), sin_lat.asin())
    }
}

impl GridProjection for Mollweide {
    fn name(&self) -> &'static str {
        "mollweide"
    }

    fn forward(&self, geo: GeoPoint) -> PopResult<GridPoint> {
        let (x, y) = self.normalize(geo);
        grid_from_normalized(x, y, self.dims)
    }

    fn inverse(&self, point: GridPoint) -> PopResult<GeoPoint> {
        let (x, y) = normalized_from_grid(point, self.dims);
        self.denormalize(x, y)
    }
}
