//! Configuration for raster assembly and the snapshot file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use popgrid_common::RasterDims;

use crate::error::{RasterError, Result};

/// Dataset file prefix of the 30 arc-second population count tiles.
pub const DEFAULT_TILE_PREFIX: &str = "gpw_v4_population_count_rev11_2020_30_sec_";

/// Raw no-data sentinel used by the source tiles.
pub const DEFAULT_NODATA: f32 = -9999.0;

/// Arrangement of square source tiles into the full raster.
///
/// Tile `i` (0-based) is placed at block `(i / block_cols, i % block_cols)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayout {
    pub block_rows: usize,
    pub block_cols: usize,
    pub tile_size: usize,
}

impl TileLayout {
    /// The global dataset: 2 x 4 tiles of 10800 x 10800 cells.
    pub const GLOBAL: TileLayout = TileLayout {
        block_rows: 2,
        block_cols: 4,
        tile_size: 10800,
    };

    /// Production 2 x 4 arrangement with a different tile size.
    pub const fn with_tile_size(tile_size: usize) -> Self {
        Self {
            block_rows: 2,
            block_cols: 4,
            tile_size,
        }
    }

    /// Number of tiles in the layout.
    pub fn tile_count(&self) -> usize {
        self.block_rows * self.block_cols
    }

    /// Cells per tile.
    pub fn tile_cells(&self) -> usize {
        self.tile_size * self.tile_size
    }

    /// Dimensions of the assembled raster.
    pub fn dims(&self) -> RasterDims {
        RasterDims::new(
            self.block_rows * self.tile_size,
            self.block_cols * self.tile_size,
        )
    }

    /// `(block_row, block_col)` of tile `index`.
    pub fn block_of(&self, index: usize) -> (usize, usize) {
        (index / self.block_cols, index % self.block_cols)
    }
}

impl Default for TileLayout {
    fn default() -> Self {
        Self::GLOBAL
    }
}

/// Configuration for building and persisting the raster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Directory holding the raw ASCII tiles.
    pub assets_dir: PathBuf,

    /// File name prefix; tiles are `{prefix}{n}.asc` for n in 1..=tile_count.
    pub tile_prefix: String,

    /// Where the processed snapshot is written and read.
    pub snapshot_path: PathBuf,

    /// Tile arrangement.
    pub layout: TileLayout,

    /// Raw value meaning "no measurement".
    pub nodata: f32,

    /// Snapshot compression level (1-9).
    pub compression_level: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            tile_prefix: DEFAULT_TILE_PREFIX.to_string(),
            snapshot_path: PathBuf::from("instance/data.snapshot"),
            layout: TileLayout::GLOBAL,
            nodata: DEFAULT_NODATA,
            compression_level: 6,
        }
    }
}

impl RasterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("POPGRID_ASSETS_DIR") {
            config.assets_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("POPGRID_TILE_PREFIX") {
            config.tile_prefix = val;
        }

        if let Ok(val) = std::env::var("POPGRID_SNAPSHOT_PATH") {
            config.snapshot_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("POPGRID_TILE_SIZE") {
            if let Ok(size) = val.parse() {
                config.layout.tile_size = size;
            }
        }

        if let Ok(val) = std::env::var("POPGRID_NODATA") {
            if let Ok(nodata) = val.parse() {
                config.nodata = nodata;
            }
        }

        if let Ok(val) = std::env::var("POPGRID_COMPRESSION_LEVEL") {
            if let Ok(level) = val.parse() {
                config.compression_level = level;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.layout.tile_size == 0 {
            return Err(RasterError::config("tile_size must be > 0"));
        }

        if self.layout.tile_count() == 0 {
            return Err(RasterError::config("tile layout must contain at least one tile"));
        }

        if self.compression_level == 0 || self.compression_level > 9 {
            return Err(RasterError::config("compression_level must be 1-9"));
        }

        if self.tile_prefix.is_empty() {
            return Err(RasterError::config("tile_prefix must not be empty"));
        }

        Ok(())
    }

    /// Path of tile `index` (0-based) on disk.
    pub fn tile_path(&self, index: usize) -> PathBuf {
        self.assets_dir
            .join(format!("{}{}.asc", self.tile_prefix, index + 1))
    }

    /// Paths of every tile in layout order.
    pub fn tile_paths(&self) -> Vec<PathBuf> {
        (0..self.layout.tile_count())
            .map(|i| self.tile_path(i))
            .collect()
    }
}
