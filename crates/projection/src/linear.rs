//! Linear (plate carrée) projection.
//!
//! Longitude and latitude are rescaled independently into the normalized
//! rectangle, so every cell spans the same angle. This is the projection
//! the query service uses to place user-drawn points on the raster.

use std::f64::consts::PI;

use popgrid_common::{GeoPoint, GridPoint, PopResult, RasterDims};

use crate::transform::{grid_from_normalized, normalized_from_grid, GridProjection};

/// Linear longitude/latitude rescale onto a raster.
#[derive(Debug, Clone, Copy)]
pub struct LinearProjection {
    dims: RasterDims,
}

impl LinearProjection {
    pub fn new(dims: RasterDims) -> Self {
        Self { dims }
    }

    /// Normalized `(x, y)` for a geographic point.
    pub fn normalize(&self, geo: GeoPoint) -> (f64, f64) {
        (geo.longitude / PI * 2.0, geo.latitude / PI * 2.0)
    }
}

impl GridProjection for LinearProjection {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn forward(&self, geo: GeoPoint) -> PopResult<GridPoint> {
        let (x, y) = self.normalize(geo);
        grid_from_normalized(x, y, self.dims)
    }

    fn inverse(&self, point: GridPoint) -> PopResult<GeoPoint> {
        let (x, y) = normalized_from_grid(point, self.dims);
        GeoPoint::from_radians(x * PI / 2.0, y * PI / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use test_utils::assert_approx_eq;

    fn global() -> LinearProjection {
        LinearProjection::new(RasterDims::GLOBAL)
    }

    #[test]
    fn test_boundary_inputs_stay_on_grid() {
        let proj = global();
        let inputs = [
            (0.0, 0.0),
            (PI, FRAC_PI_2),
            (-PI, -FRAC_PI_2),
            (PI, -FRAC_PI_2),
            (-PI, FRAC_PI_2),
        ];

        for (lon, lat) in inputs {
            let geo = GeoPoint::from_radians(lon, lat).unwrap();
            let p = proj.forward(geo).unwrap();
            println!("({}, {}) -> {}", lon, lat, p);
            assert!(
                RasterDims::GLOBAL.contains_cell(p),
                "{} should be a valid cell",
                p
            );
        }
    }

    #[test]
    fn test_known_points() {
        let proj = global();

        let origin = proj.forward(GeoPoint::from_degrees(0.0, 0.0).unwrap()).unwrap();
        assert_eq!(origin, GridPoint::new(10800, 21600));

        let north_west = proj
            .forward(GeoPoint::from_degrees(-180.0, 90.0).unwrap())
            .unwrap();
        assert_eq!(north_west, GridPoint::new(0, 0));

        // 30 arc-seconds per cell: 1 degree is 120 cells
        let p = proj
            .forward(GeoPoint::from_degrees(1.0, -1.0).unwrap())
            .unwrap();
        assert_eq!(p, GridPoint::new(10920, 21720));
    }

    #[test]
    fn test_inverse_of_corner() {
        let proj = global();
        let geo = proj.inverse(GridPoint::new(0, 0)).unwrap();
        assert_approx_eq!(geo.longitude, -PI, 1e-12);
        assert_approx_eq!(geo.latitude, FRAC_PI_2, 1e-12);

        let geo = proj.inverse(GridPoint::new(21600, 43200)).unwrap();
        assert_approx_eq!(geo.longitude, PI, 1e-12);
        assert_approx_eq!(geo.latitude, -FRAC_PI_2, 1e-12);
    }

    #[test]
    fn test_inverse_rejects_points_off_grid() {
        let proj = global();
        assert!(proj.inverse(GridPoint::new(-1, 0)).is_err());
        assert!(proj.inverse(GridPoint::new(0, 43201)).is_err());
    }

    #[test]
    fn test_round_trip_within_one_cell() {
        let proj = global();
        let cell = PI / 21600.0;

        for lon_deg in (-170..=170).step_by(17) {
            for lat_deg in (-85..=85).step_by(5) {
                let geo = GeoPoint::from_degrees(lon_deg as f64 + 0.37, lat_deg as f64 - 0.21)
                    .unwrap();
                let back = proj.inverse(proj.forward(geo).unwrap()).unwrap();
                assert!((back.longitude - geo.longitude).abs() <= cell);
                assert!((back.latitude - geo.latitude).abs() <= cell);
            }
        }
    }
}
