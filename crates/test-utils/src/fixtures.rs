//! Common test fixtures for popgrid tests.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use popgrid_common::{GridPoint, RasterDims};

/// Raster dimensions used across the test suite.
pub mod dims {
    use popgrid_common::RasterDims;

    /// Smallest raster with the production 2x4 tile layout (tile size 3).
    pub const TINY: RasterDims = RasterDims::new(6, 12);

    /// 2x4 layout with tile size 10.
    pub const SMALL: RasterDims = RasterDims::new(20, 40);

    /// 2x4 layout with tile size 50.
    pub const MEDIUM: RasterDims = RasterDims::new(100, 200);
}

/// Counter-clockwise corners of an axis-aligned square.
///
/// `(top, left)` is the first vertex; the square spans `side` cells.
pub fn square_corners(top: i64, left: i64, side: i64) -> Vec<GridPoint> {
    rectangle_corners(top, left, side, side)
}

/// Counter-clockwise corners of an axis-aligned rectangle.
pub fn rectangle_corners(top: i64, left: i64, height: i64, width: i64) -> Vec<GridPoint> {
    vec![
        GridPoint::new(top, left),
        GridPoint::new(top + height, left),
        GridPoint::new(top + height, left + width),
        GridPoint::new(top, left + width),
    ]
}

/// Corners spanning the whole raster, including the far edges.
pub fn full_extent_corners(dims: RasterDims) -> Vec<GridPoint> {
    rectangle_corners(0, 0, dims.rows as i64, dims.cols as i64)
}

/// Wire-order `[col, row]` pairs for a list of points.
pub fn to_wire(points: &[GridPoint]) -> Vec<[i64; 2]> {
    points.iter().map(|p| p.to_col_row()).collect()
}

/// Renders an ESRI ASCII grid with the six-line header.
pub fn ascii_tile_text(size: usize, values: &[f32], nodata: f32) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "ncols         {}", size);
    let _ = writeln!(text, "nrows         {}", size);
    let _ = writeln!(text, "xllcorner     -180");
    let _ = writeln!(text, "yllcorner     -90");
    let _ = writeln!(text, "cellsize      0.0083333333333333");
    let _ = writeln!(text, "NODATA_value  {}", nodata);
    for row in values.chunks(size) {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(text, "{}", line.join(" "));
    }
    text
}

/// Writes an ESRI ASCII tile to `dir/name` and returns its path.
pub fn write_ascii_tile(
    dir: &Path,
    name: &str,
    size: usize,
    values: &[f32],
    nodata: f32,
) -> io::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, ascii_tile_text(size, values, nodata))?;
    Ok(path)
}

/// Writes a full set of tiles named `{prefix}{i}.asc` (1-based).
pub fn write_ascii_tiles(
    dir: &Path,
    prefix: &str,
    size: usize,
    tiles: &[Vec<f32>],
    nodata: f32,
) -> io::Result<Vec<PathBuf>> {
    tiles
        .iter()
        .enumerate()
        .map(|(i, tile)| write_ascii_tile(dir, &format!("{}{}.asc", prefix, i + 1), size, tile, nodata))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_is_counter_clockwise() {
        let sq = square_corners(0, 0, 10);
        let mut area2 = 0;
        for i in 0..sq.len() {
            area2 += sq[i].cross(sq[(i + 1) % sq.len()]);
        }
        assert!(area2 > 0, "signed area should be positive, got {}", area2);
        assert_eq!(area2, 200);
    }

    #[test]
    fn test_full_extent() {
        let corners = full_extent_corners(dims::TINY);
        assert_eq!(corners[2], GridPoint::new(6, 12));
    }

    #[test]
    fn test_ascii_tile_text_header() {
        let text = ascii_tile_text(2, &[1.0, 2.0, -9999.0, 4.5], -9999.0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].starts_with("ncols"));
        assert!(lines[5].starts_with("NODATA_value"));
        assert_eq!(lines[6], "1 2");
        assert_eq!(lines[7], "-9999 4.5");
    }
}
