//! Tile ingestion pipeline.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, instrument};

use raster_store::{read_tile, RasterConfig, RasterStore};

/// What one preprocessing run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub tiles: usize,
    pub total_population: f64,
    pub elapsed_ms: u64,
}

/// Reads tiles, builds the raster and writes the snapshot.
pub struct Preprocessor {
    config: RasterConfig,
}

impl Preprocessor {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline.
    pub fn run(&self) -> Result<RunSummary> {
        let start = Instant::now();

        let tiles = self.load_tiles()?;
        let store = RasterStore::build(&tiles, &self.config.layout, self.config.nodata)
            .context("Failed to assemble raster")?;
        drop(tiles);

        store
            .save_with_compression(&self.config.snapshot_path, self.config.compression_level)
            .with_context(|| {
                format!("Failed to write snapshot {:?}", self.config.snapshot_path)
            })?;
        info!(path = %self.config.snapshot_path.display(), "Snapshot written");

        Ok(RunSummary {
            tiles: self.config.layout.tile_count(),
            total_population: store.total(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Parse every tile in layout order, in parallel.
    #[instrument(skip(self), fields(count = self.config.layout.tile_count()))]
    pub fn load_tiles(&self) -> Result<Vec<Vec<f32>>> {
        let size = self.config.layout.tile_size;
        let nodata = self.config.nodata;

        self.config
            .tile_paths()
            .par_iter()
            .map(|path| -> Result<Vec<f32>> {
                let start = Instant::now();
                let tile = read_tile(path, size, nodata)
                    .with_context(|| format!("Failed to load tile {:?}", path))?;
                debug!(
                    file = %path.display(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Tile loaded"
                );
                Ok(tile)
            })
            .collect()
    }
}
