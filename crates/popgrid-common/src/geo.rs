//! Geographic coordinates.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use crate::error::{PopError, PopResult};

/// A point on the globe, in radians.
///
/// Longitude is in [-π, π] and latitude in [-π/2, π/2]; both constructors
/// reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Create a point from radians.
    pub fn from_radians(longitude: f64, latitude: f64) -> PopResult<Self> {
        if !(-PI..=PI).contains(&longitude) {
            return Err(PopError::out_of_range(format!(
                "longitude {} rad not in [-pi, pi]",
                longitude
            )));
        }
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            return Err(PopError::out_of_range(format!(
                "latitude {} rad not in [-pi/2, pi/2]",
                latitude
            )));
        }

        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Create a point from degrees.
    ///
    /// The range check happens in degrees; the converted value is clamped so
    /// that ±180° / ±90° never fail on a rounding ulp.
    pub fn from_degrees(longitude: f64, latitude: f64) -> PopResult<Self> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(PopError::out_of_range(format!(
                "longitude {}° not in [-180, 180]",
                longitude
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(PopError::out_of_range(format!(
                "latitude {}° not in [-90, 90]",
                latitude
            )));
        }

        Ok(Self {
            longitude: longitude.to_radians().clamp(-PI, PI),
            latitude: latitude.to_radians().clamp(-FRAC_PI_2, FRAC_PI_2),
        })
    }

    /// Longitude and latitude in degrees.
    pub fn to_degrees(self) -> (f64, f64) {
        (self.longitude.to_degrees(), self.latitude.to_degrees())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lon, lat) = self.to_degrees();
        write!(f, "({:.2}, {:.2})", lon, lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_radians_bounds() {
        let p = GeoPoint::from_radians(0.0, 0.0).unwrap();
        assert_eq!(p.longitude, 0.0);
        assert_eq!(p.latitude, 0.0);

        let p = GeoPoint::from_radians(PI, FRAC_PI_2).unwrap();
        assert_eq!(p.longitude, PI);
        assert_eq!(p.latitude, FRAC_PI_2);

        let p = GeoPoint::from_radians(-PI, -FRAC_PI_2).unwrap();
        assert_eq!(p.longitude, -PI);
        assert_eq!(p.latitude, -FRAC_PI_2);
    }

    #[test]
    fn test_from_radians_rejects_outside() {
        assert!(GeoPoint::from_radians(PI + 1e-9, 0.0).is_err());
        assert!(GeoPoint::from_radians(0.0, -FRAC_PI_2 - 1e-9).is_err());
        assert!(GeoPoint::from_radians(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_from_degrees() {
        let p = GeoPoint::from_degrees(180.0, 90.0).unwrap();
        assert!((p.longitude - PI).abs() < 1e-12);
        assert!((p.latitude - FRAC_PI_2).abs() < 1e-12);

        let p = GeoPoint::from_degrees(90.0, 45.0).unwrap();
        assert!((p.longitude - FRAC_PI_2).abs() < 1e-12);
        assert!((p.latitude - PI / 4.0).abs() < 1e-12);

        assert!(GeoPoint::from_degrees(180.5, 0.0).is_err());
        assert!(GeoPoint::from_degrees(0.0, -90.01).is_err());
    }

    #[test]
    fn test_display_in_degrees() {
        let p = GeoPoint::from_degrees(30.0, -15.5).unwrap();
        assert_eq!(p.to_string(), "(30.00, -15.50)");
    }
}
