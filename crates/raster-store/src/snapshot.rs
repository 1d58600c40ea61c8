//! Compressed snapshot format for a built raster.
//!
//! Layout of the decompressed gzip stream:
//!
//! | Offset | Size             | Content                         |
//! |--------|------------------|---------------------------------|
//! | 0      | 8                | magic `POPGRID1`                |
//! | 8      | 4                | rows, `u32` little-endian       |
//! | 12     | 4                | cols, `u32` little-endian       |
//! | 16     | rows * cols * 4  | cumulative values, `f32` LE     |

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use popgrid_common::RasterDims;

use crate::error::{RasterError, Result};

/// Magic bytes at the start of every snapshot.
pub const MAGIC: &[u8; 8] = b"POPGRID1";

/// Largest raster a snapshot header may declare, four times the global grid.
pub const MAX_SNAPSHOT_CELLS: u64 =
    4 * RasterDims::GLOBAL.rows as u64 * RasterDims::GLOBAL.cols as u64;

/// Payload bytes decoded per read; a multiple of 4.
const READ_CHUNK_BYTES: usize = 64 * 1024;

/// Write a raster to `writer` as a gzip stream.
pub fn write_snapshot<W: Write>(
    writer: W,
    dims: RasterDims,
    data: &[f32],
    level: u32,
) -> Result<()> {
    if data.len() != dims.len() {
        return Err(RasterError::shape_mismatch("snapshot payload", dims.len(), data.len()));
    }
    let rows = u32::try_from(dims.rows)
        .map_err(|_| RasterError::snapshot(format!("row count {} exceeds u32", dims.rows)))?;
    let cols = u32::try_from(dims.cols)
        .map_err(|_| RasterError::snapshot(format!("column count {} exceeds u32", dims.cols)))?;

    let mut encoder = GzEncoder::new(writer, Compression::new(level));
    encoder.write_all(MAGIC)?;
    encoder.write_all(&rows.to_le_bytes())?;
    encoder.write_all(&cols.to_le_bytes())?;

    let mut buf = Vec::with_capacity(dims.cols.max(1) * 4);
    for row in data.chunks(dims.cols.max(1)) {
        buf.clear();
        for value in row {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        encoder.write_all(&buf)?;
    }

    encoder.finish()?.flush()?;
    Ok(())
}

/// Read a raster previously written by [`write_snapshot`].
pub fn read_snapshot<R: Read>(reader: R) -> Result<(RasterDims, Vec<f32>)> {
    let mut decoder = GzDecoder::new(reader);

    let mut header = [0u8; 16];
    decoder
        .read_exact(&mut header)
        .map_err(|e| RasterError::snapshot(format!("truncated header: {}", e)))?;

    if &header[0..8] != MAGIC {
        return Err(RasterError::snapshot("bad magic, not a popgrid snapshot"));
    }

    let rows = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
    let cols = u32::from_le_bytes([header[12], header[13], header[14], header[15]]);
    let cells = rows as u64 * cols as u64;
    if cells == 0 {
        return Err(RasterError::snapshot(format!("empty raster {}x{}", rows, cols)));
    }
    if cells > MAX_SNAPSHOT_CELLS {
        return Err(RasterError::snapshot(format!(
            "header declares {}x{} cells, limit is {}",
            rows, cols, MAX_SNAPSHOT_CELLS
        )));
    }
    let expected = usize::try_from(cells)
        .map_err(|_| RasterError::snapshot(format!("{} cells do not fit in memory", cells)))?;
    let dims = RasterDims::new(rows as usize, cols as usize);

    // Grow with the payload actually decoded, never with the header's claim.
    let mut data = Vec::new();
    let mut buf = [0u8; READ_CHUNK_BYTES];
    while data.len() < expected {
        let want = (expected - data.len()).saturating_mul(4).min(READ_CHUNK_BYTES);
        decoder.read_exact(&mut buf[..want]).map_err(|e| {
            RasterError::snapshot(format!(
                "payload ends after {} of {} values: {}",
                data.len(),
                expected,
                e
            ))
        })?;
        data.extend(
            buf[..want]
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        );
    }

    let mut trailing = [0u8; 1];
    if decoder.read(&mut trailing)? != 0 {
        return Err(RasterError::snapshot("trailing data after payload"));
    }

    Ok((dims, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(dims: RasterDims, data: &[f32]) -> Vec<u8> {
        let mut out = Vec::new();
        write_snapshot(&mut out, dims, data, 1).unwrap();
        out
    }

    #[test]
    fn test_round_trip_is_bit_identical() {
        let dims = RasterDims::new(3, 4);
        let data: Vec<f32> = (0..12).map(|i| i as f32 * 0.1 + 1e-7).collect();

        let (read_dims, read_data) = read_snapshot(encode(dims, &data).as_slice()).unwrap();
        assert_eq!(read_dims, dims);
        let bits: Vec<u32> = data.iter().map(|v| v.to_bits()).collect();
        let read_bits: Vec<u32> = read_data.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits, read_bits);
    }

    #[test]
    fn test_rejects_wrong_payload_length() {
        let err = write_snapshot(Vec::new(), RasterDims::new(2, 2), &[1.0; 3], 1).unwrap_err();
        assert!(matches!(err, RasterError::ShapeMismatch { expected: 4, actual: 3, .. }));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"NOTMAGIC\x01\x00\x00\x00\x01\x00\x00\x00\x00\x00\x80\x3f").unwrap();
        let bytes = encoder.finish().unwrap();

        let err = read_snapshot(bytes.as_slice()).unwrap_err();
        assert!(err.to_string().contains("bad magic"), "got: {}", err);
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(MAGIC).unwrap();
        encoder.write_all(&2u32.to_le_bytes()).unwrap();
        encoder.write_all(&2u32.to_le_bytes()).unwrap();
        encoder.write_all(&1.0f32.to_le_bytes()).unwrap();
        let bytes = encoder.finish().unwrap();

        assert!(matches!(
            read_snapshot(bytes.as_slice()),
            Err(RasterError::Snapshot(_))
        ));
    }

    fn header_only(rows: u32, cols: u32) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(MAGIC).unwrap();
        encoder.write_all(&rows.to_le_bytes()).unwrap();
        encoder.write_all(&cols.to_le_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_rejects_oversized_header() {
        for (rows, cols) in [(u32::MAX, u32::MAX), (200_000, 200_000), (1, u32::MAX)] {
            let err = read_snapshot(header_only(rows, cols).as_slice()).unwrap_err();
            assert!(matches!(err, RasterError::Snapshot(_)), "{}x{}", rows, cols);
            assert!(err.to_string().contains("limit"), "got: {}", err);
        }
    }

    #[test]
    fn test_large_header_without_payload_is_truncated() {
        // Within the limit, so only the missing payload can reject it
        let err = read_snapshot(header_only(50_000, 50_000).as_slice()).unwrap_err();
        assert!(err.to_string().contains("payload ends after 0"), "got: {}", err);
    }

    #[test]
    fn test_rejects_empty_header() {
        let err = read_snapshot(header_only(0, 7).as_slice()).unwrap_err();
        assert!(err.to_string().contains("empty"), "got: {}", err);
    }

    #[test]
    fn test_rejects_trailing_data() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(MAGIC).unwrap();
        encoder.write_all(&1u32.to_le_bytes()).unwrap();
        encoder.write_all(&1u32.to_le_bytes()).unwrap();
        encoder.write_all(&1.0f32.to_le_bytes()).unwrap();
        encoder.write_all(&[0xFF]).unwrap();
        let bytes = encoder.finish().unwrap();

        let err = read_snapshot(bytes.as_slice()).unwrap_err();
        assert!(err.to_string().contains("trailing"), "got: {}", err);
    }

    #[test]
    fn test_rejects_non_gzip() {
        assert!(read_snapshot(&b"plain bytes"[..]).is_err());
    }
}
