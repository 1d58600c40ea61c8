//! The assembled raster and its row-wise prefix sums.

use rayon::prelude::*;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use popgrid_common::RasterDims;

use crate::config::TileLayout;
use crate::error::{RasterError, Result};
use crate::snapshot;

/// Default snapshot compression level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Population raster holding per-row cumulative sums.
///
/// Cell `(r, c)` stores the sum of the original values of row `r` from
/// column 0 through `c`, so any horizontal run sums in O(1). The store is
/// built once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RasterStore {
    dims: RasterDims,
    cumulative: Vec<f32>,
    total: f64,
}

impl RasterStore {
    /// Assemble the raster from square tiles and compute prefix sums.
    ///
    /// Tiles are given in layout order; tile `i` lands at block
    /// `(i / block_cols, i % block_cols)`. Cells equal to `nodata` become 0.
    pub fn build(tiles: &[Vec<f32>], layout: &TileLayout, nodata: f32) -> Result<Self> {
        if tiles.len() != layout.tile_count() {
            return Err(RasterError::shape_mismatch(
                "tile set",
                layout.tile_count(),
                tiles.len(),
            ));
        }
        for (i, tile) in tiles.iter().enumerate() {
            if tile.len() != layout.tile_cells() {
                return Err(RasterError::shape_mismatch(
                    format!("tile {}", i),
                    layout.tile_cells(),
                    tile.len(),
                ));
            }
        }

        let dims = layout.dims();
        if dims.is_empty() {
            return Err(RasterError::config(format!("empty raster {}", dims)));
        }

        let start = Instant::now();
        let size = layout.tile_size;
        let mut values = vec![0.0f32; dims.len()];

        for (i, tile) in tiles.iter().enumerate() {
            let (block_row, block_col) = layout.block_of(i);
            for (r, tile_row) in tile.chunks_exact(size).enumerate() {
                let offset = dims.flat_index(block_row * size + r, block_col * size);
                values[offset..offset + size].copy_from_slice(tile_row);
            }
        }
        debug!(tiles = tiles.len(), dims = %dims, "Assembled tiles");

        let store = Self::from_values(dims, values, nodata)?;
        info!(
            dims = %dims,
            total = store.total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built population raster"
        );
        Ok(store)
    }

    /// Build from a full row-major raster of original values.
    pub fn from_values(dims: RasterDims, mut values: Vec<f32>, nodata: f32) -> Result<Self> {
        if values.len() != dims.len() {
            return Err(RasterError::shape_mismatch("raster", dims.len(), values.len()));
        }
        if dims.is_empty() {
            return Err(RasterError::config(format!("empty raster {}", dims)));
        }

        values.par_chunks_mut(dims.cols).for_each(|row| {
            let mut running = 0.0f32;
            for cell in row.iter_mut() {
                if *cell == nodata {
                    *cell = 0.0;
                }
                running += *cell;
                *cell = running;
            }
        });

        Ok(Self::from_cumulative(dims, values))
    }

    fn from_cumulative(dims: RasterDims, cumulative: Vec<f32>) -> Self {
        let total: f64 = cumulative
            .chunks(dims.cols)
            .map(|row| row.last().copied().unwrap_or(0.0) as f64)
            .sum();
        Self {
            dims,
            cumulative,
            total,
        }
    }

    /// Raster dimensions.
    pub fn dims(&self) -> RasterDims {
        self.dims
    }

    /// Sum of the original values of `row` over columns `start..=end`.
    ///
    /// Returns 0 for a row outside the raster or an empty range. `end` is
    /// clamped to the last column and `start` to 0.
    #[inline]
    pub fn range_sum(&self, row: i64, start: i64, end: i64) -> f64 {
        if row < 0 || row > self.dims.last_row() {
            return 0.0;
        }
        let start = start.max(0);
        let end = end.min(self.dims.last_col());
        if start > end {
            return 0.0;
        }

        let base = row as usize * self.dims.cols;
        let upper = self.cumulative[base + end as usize] as f64;
        let lower = if start == 0 {
            0.0
        } else {
            self.cumulative[base + start as usize - 1] as f64
        };
        upper - lower
    }

    /// Sum of a whole row.
    pub fn row_total(&self, row: i64) -> f64 {
        self.range_sum(row, 0, self.dims.last_col())
    }

    /// Grand total of the raster.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Write a snapshot with the default compression level.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.save_with_compression(path, DEFAULT_COMPRESSION_LEVEL)
    }

    /// Write a snapshot with an explicit gzip level (1-9).
    pub fn save_with_compression(&self, path: &Path, level: u32) -> Result<()> {
        if level == 0 || level > 9 {
            return Err(RasterError::config(format!(
                "compression level must be 1-9, got {}",
                level
            )));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let start = Instant::now();
        let writer = BufWriter::new(File::create(path)?);
        snapshot::write_snapshot(writer, self.dims, &self.cumulative, level)?;

        info!(
            path = %path.display(),
            dims = %self.dims,
            level = level,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Saved raster snapshot"
        );
        Ok(())
    }

    /// Restore a store from a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let start = Instant::now();
        let reader = BufReader::new(File::open(path)?);
        let (dims, cumulative) = snapshot::read_snapshot(reader)?;
        let store = Self::from_cumulative(dims, cumulative);

        info!(
            path = %path.display(),
            dims = %dims,
            total = store.total,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded raster snapshot"
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_3x4() -> RasterStore {
        let values = vec![
            1.0, 2.0, 3.0, 4.0, //
            -9999.0, 5.0, -9999.0, 1.0, //
            0.5, 0.5, 0.5, 0.5,
        ];
        RasterStore::from_values(RasterDims::new(3, 4), values, -9999.0).unwrap()
    }

    #[test]
    fn test_range_sum() {
        let store = store_3x4();
        assert_eq!(store.range_sum(0, 0, 3), 10.0);
        assert_eq!(store.range_sum(0, 1, 2), 5.0);
        assert_eq!(store.range_sum(0, 2, 2), 3.0);
        assert_eq!(store.range_sum(1, 1, 3), 6.0);
        assert_eq!(store.range_sum(2, 1, 2), 1.0);
    }

    #[test]
    fn test_range_sum_edges() {
        let store = store_3x4();
        // Empty and out-of-bounds rows
        assert_eq!(store.range_sum(0, 3, 2), 0.0);
        assert_eq!(store.range_sum(3, 0, 3), 0.0);
        assert_eq!(store.range_sum(-1, 0, 3), 0.0);
        // Clamped, never wrapped
        assert_eq!(store.range_sum(0, 2, 100), 7.0);
        assert_eq!(store.range_sum(0, -5, 1), 3.0);
        assert_eq!(store.range_sum(0, 4, 100), 0.0);
    }

    #[test]
    fn test_totals() {
        let store = store_3x4();
        assert_eq!(store.row_total(1), 6.0);
        assert_eq!(store.total(), 18.0);
    }

    #[test]
    fn test_from_values_shape_mismatch() {
        let err = RasterStore::from_values(RasterDims::new(2, 2), vec![1.0; 3], -9999.0)
            .unwrap_err();
        assert!(matches!(err, RasterError::ShapeMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn test_build_places_tiles() {
        // 2x4 layout of 1x1 tiles: tile i holds the value i
        let layout = TileLayout::with_tile_size(1);
        let tiles: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32]).collect();
        let store = RasterStore::build(&tiles, &layout, -9999.0).unwrap();

        assert_eq!(store.dims(), RasterDims::new(2, 4));
        assert_eq!(store.range_sum(0, 3, 3), 3.0);
        assert_eq!(store.range_sum(1, 0, 0), 4.0);
        assert_eq!(store.range_sum(1, 0, 3), 4.0 + 5.0 + 6.0 + 7.0);
        assert_eq!(store.total(), 28.0);
    }

    #[test]
    fn test_build_rejects_wrong_tiles() {
        let layout = TileLayout::with_tile_size(2);
        let tiles = vec![vec![0.0; 4]; 7];
        assert!(matches!(
            RasterStore::build(&tiles, &layout, -9999.0),
            Err(RasterError::ShapeMismatch { expected: 8, actual: 7, .. })
        ));

        let mut tiles = vec![vec![0.0; 4]; 8];
        tiles[5] = vec![0.0; 3];
        let err = RasterStore::build(&tiles, &layout, -9999.0).unwrap_err();
        assert!(err.to_string().contains("tile 5"), "got: {}", err);
    }

    #[test]
    fn test_save_rejects_bad_level() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_3x4()
            .save_with_compression(&dir.path().join("s.snapshot"), 0)
            .unwrap_err();
        assert!(matches!(err, RasterError::Config(_)));
    }
}
