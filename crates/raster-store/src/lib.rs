//! Population raster storage.
//!
//! The raster is assembled from square ESRI ASCII tiles, each row is
//! replaced by its running sum, and the result is served read-only:
//!
//! - [`RasterStore::range_sum`] answers "sum of row r over columns a..=b"
//!   with one subtraction.
//! - [`RasterStore::save`] / [`RasterStore::load`] persist the processed
//!   raster as a single gzip snapshot so the tiles are parsed only once.

pub mod ascii;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod store;

pub use ascii::{parse_tile, read_tile, AsciiHeader};
pub use config::{RasterConfig, TileLayout, DEFAULT_NODATA, DEFAULT_TILE_PREFIX};
pub use error::{RasterError, Result};
pub use store::RasterStore;
