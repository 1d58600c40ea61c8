//! ESRI ASCII grid reader for the raw population tiles.
//!
//! Each tile starts with six `key value` header lines followed by
//! whitespace-separated values, north row first:
//!
//! ```text
//! ncols         10800
//! nrows         10800
//! xllcorner     -180
//! yllcorner     -90
//! cellsize      0.0083333333333333
//! NODATA_value  -9999
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::error::{RasterError, Result};

/// Parsed tile header.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiHeader {
    pub ncols: usize,
    pub nrows: usize,
    pub x_lower_left: f64,
    pub y_lower_left: f64,
    pub cellsize: f64,
    pub nodata_value: f64,
}

/// Read a square tile of `expected_size` cells per side from disk.
///
/// Values equal to the header's `NODATA_value` are replaced by `nodata`.
pub fn read_tile(path: &Path, expected_size: usize, nodata: f32) -> Result<Vec<f32>> {
    let file = File::open(path)?;
    let name = path.display().to_string();
    let values = parse_tile(BufReader::new(file), &name, expected_size, nodata)?;
    debug!(path = %name, cells = values.len(), "Read ASCII tile");
    Ok(values)
}

/// Parse a tile from any buffered reader. `source_name` labels errors.
pub fn parse_tile<R: BufRead>(
    mut reader: R,
    source_name: &str,
    expected_size: usize,
    nodata: f32,
) -> Result<Vec<f32>> {
    let header = parse_header(&mut reader, source_name)?;

    if header.ncols != expected_size || header.nrows != expected_size {
        return Err(RasterError::tile_format(
            source_name,
            format!(
                "tile is {}x{}, expected {}x{}",
                header.nrows, header.ncols, expected_size, expected_size
            ),
        ));
    }

    let expected = header.nrows * header.ncols;
    let source_nodata = header.nodata_value as f32;
    let mut values = Vec::with_capacity(expected);
    let mut line = String::new();
    let mut line_no = 6;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;

        for token in line.split_whitespace() {
            let value: f32 = token.parse().map_err(|_| {
                RasterError::tile_format(
                    source_name,
                    format!("line {}: invalid value '{}'", line_no, token),
                )
            })?;
            if values.len() == expected {
                return Err(RasterError::tile_format(
                    source_name,
                    format!("more than {} values", expected),
                ));
            }
            values.push(if value == source_nodata { nodata } else { value });
        }
    }

    if values.len() != expected {
        return Err(RasterError::tile_format(
            source_name,
            format!("expected {} values, found {}", expected, values.len()),
        ));
    }

    Ok(values)
}

/// Parse the six header lines.
pub fn parse_header<R: BufRead>(reader: &mut R, source_name: &str) -> Result<AsciiHeader> {
    let mut ncols = None;
    let mut nrows = None;
    let mut xll = None;
    let mut yll = None;
    let mut cellsize = None;
    let mut nodata = None;

    let mut line = String::new();
    for line_no in 1..=6 {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(RasterError::tile_format(
                source_name,
                format!("header ends at line {}", line_no),
            ));
        }

        let mut parts = line.split_whitespace();
        let (key, raw) = match (parts.next(), parts.next()) {
            (Some(key), Some(raw)) => (key.to_ascii_lowercase(), raw),
            _ => {
                return Err(RasterError::tile_format(
                    source_name,
                    format!("line {}: expected 'key value'", line_no),
                ))
            }
        };

        let number: f64 = raw.parse().map_err(|_| {
            RasterError::tile_format(
                source_name,
                format!("line {}: invalid number '{}' for {}", line_no, raw, key),
            )
        })?;

        match key.as_str() {
            "ncols" => ncols = Some(number),
            "nrows" => nrows = Some(number),
            "xllcorner" | "xllcenter" => xll = Some(number),
            "yllcorner" | "yllcenter" => yll = Some(number),
            "cellsize" => cellsize = Some(number),
            "nodata_value" => nodata = Some(number),
            other => {
                return Err(RasterError::tile_format(
                    source_name,
                    format!("line {}: unknown header key '{}'", line_no, other),
                ))
            }
        }
    }

    let missing = |what: &str| RasterError::tile_format(source_name, format!("missing {}", what));
    let dimension = |value: f64, what: &str| -> Result<usize> {
        if value < 1.0 || value.fract() != 0.0 {
            return Err(RasterError::tile_format(
                source_name,
                format!("{} must be a positive integer, got {}", what, value),
            ));
        }
        Ok(value as usize)
    };

    Ok(AsciiHeader {
        ncols: dimension(ncols.ok_or_else(|| missing("ncols"))?, "ncols")?,
        nrows: dimension(nrows.ok_or_else(|| missing("nrows"))?, "nrows")?,
        x_lower_left: xll.ok_or_else(|| missing("xllcorner"))?,
        y_lower_left: yll.ok_or_else(|| missing("yllcorner"))?,
        cellsize: cellsize.ok_or_else(|| missing("cellsize"))?,
        nodata_value: nodata.ok_or_else(|| missing("NODATA_value"))?,
    })
}
