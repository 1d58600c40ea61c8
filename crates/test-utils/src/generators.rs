//! Test data generators for synthetic population rasters.
//!
//! Generated values are small integers so that every partial sum is exact
//! in `f32`, which lets tests compare aggregated totals with `assert_eq!`.

use popgrid_common::{GridPoint, RasterDims};
use rand::Rng;

/// Sentinel written into generated tiles for missing measurements.
pub const NODATA: f32 = -9999.0;

/// Creates a test grid with predictable values.
///
/// Each cell value is `(row * 3 + col) % 5`, so rows differ from each other
/// and every value fits in a few bits.
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(2, 4);
/// assert_eq!(grid, vec![0.0, 1.0, 2.0, 3.0, 3.0, 4.0, 0.0, 1.0]);
/// ```
pub fn create_test_grid(rows: usize, cols: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push(((row * 3 + col) % 5) as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(rows: usize, cols: usize, value: f32) -> Vec<f32> {
    vec![value; rows * cols]
}

/// Creates a population-like grid with the no-data sentinel sprinkled in.
///
/// Roughly one cell in seven is [`NODATA`]; the rest hold integer counts
/// in `0..100` derived from a deterministic hash of `(row, col, seed)`.
pub fn create_population_grid(rows: usize, cols: usize, seed: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let hash = simple_hash(col as u32, row as u32, seed);
            let value = if hash % 7 == 0 {
                NODATA
            } else {
                (hash % 100) as f32
            };
            data.push(value);
        }
    }
    data
}

/// Row-wise sums of a raw grid with the sentinel counted as zero.
pub fn row_sums(data: &[f32], cols: usize) -> Vec<f64> {
    data.chunks(cols)
        .map(|row| {
            row.iter()
                .filter(|&&v| v != NODATA)
                .map(|&v| v as f64)
                .sum()
        })
        .collect()
}

/// Sum of a raw grid with the sentinel counted as zero.
pub fn grid_total(data: &[f32]) -> f64 {
    data.iter()
        .filter(|&&v| v != NODATA)
        .map(|&v| v as f64)
        .sum()
}

/// Splits a full raster into tiles in row-major block order.
///
/// Block `i` covers rows `(i / block_cols) * tile_size ..` and columns
/// `(i % block_cols) * tile_size ..`.
pub fn split_into_tiles(
    data: &[f32],
    block_rows: usize,
    block_cols: usize,
    tile_size: usize,
) -> Vec<Vec<f32>> {
    let cols = block_cols * tile_size;
    let mut tiles = Vec::with_capacity(block_rows * block_cols);
    for i in 0..block_rows * block_cols {
        let row0 = (i / block_cols) * tile_size;
        let col0 = (i % block_cols) * tile_size;
        let mut tile = Vec::with_capacity(tile_size * tile_size);
        for r in 0..tile_size {
            let start = (row0 + r) * cols + col0;
            tile.extend_from_slice(&data[start..start + tile_size]);
        }
        tiles.push(tile);
    }
    tiles
}

/// Random cell corners within a raster, inclusive of the far edges.
pub fn random_corners<R: Rng>(rng: &mut R, count: usize, dims: RasterDims) -> Vec<GridPoint> {
    (0..count)
        .map(|_| {
            GridPoint::new(
                rng.gen_range(0..=dims.rows as i64),
                rng.gen_range(0..=dims.cols as i64),
            )
        })
        .collect()
}

/// Random points in a square window, possibly negative.
pub fn random_points_in<R: Rng>(rng: &mut R, count: usize, min: i64, max: i64) -> Vec<GridPoint> {
    (0..count)
        .map(|_| GridPoint::new(rng.gen_range(min..=max), rng.gen_range(min..=max)))
        .collect()
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_create_test_grid() {
        let grid = create_test_grid(5, 10);
        assert_eq!(grid.len(), 50);
        assert_eq!(grid[0], 0.0); // row=0, col=0
        assert_eq!(grid[1], 1.0); // row=0, col=1
        assert_eq!(grid[10], 3.0); // row=1, col=0
    }

    #[test]
    fn test_population_grid_is_deterministic() {
        let a = create_population_grid(12, 12, 7);
        let b = create_population_grid(12, 12, 7);
        assert_eq!(a, b);
        assert!(a.iter().any(|&v| v == NODATA), "expected some no-data cells");
        assert!(a.iter().all(|&v| v == NODATA || (0.0..100.0).contains(&v)));
    }

    #[test]
    fn test_row_sums_skip_nodata() {
        let data = vec![1.0, NODATA, 2.0, 3.0, 4.0, NODATA];
        assert_eq!(row_sums(&data, 3), vec![3.0, 7.0]);
        assert_eq!(grid_total(&data), 10.0);
    }

    #[test]
    fn test_split_into_tiles() {
        // 2x4 blocks of 2x2 tiles
        let data: Vec<f32> = (0..32).map(|v| v as f32).collect();
        let tiles = split_into_tiles(&data, 2, 4, 2);
        assert_eq!(tiles.len(), 8);
        assert_eq!(tiles[0], vec![0.0, 1.0, 8.0, 9.0]);
        assert_eq!(tiles[3], vec![6.0, 7.0, 14.0, 15.0]);
        assert_eq!(tiles[4], vec![16.0, 17.0, 24.0, 25.0]);
    }

    #[test]
    fn test_random_corners_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let dims = RasterDims::new(6, 12);
        for p in random_corners(&mut rng, 200, dims) {
            assert!(dims.contains_corner(p));
        }
    }
}
