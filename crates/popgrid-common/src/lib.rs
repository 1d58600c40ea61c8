//! Common types and utilities shared across all popgrid crates and services.

pub mod bbox;
pub mod error;
pub mod geo;
pub mod grid;

pub use bbox::GridBounds;
pub use error::{PopError, PopResult};
pub use geo::GeoPoint;
pub use grid::{GridPoint, RasterDims};
