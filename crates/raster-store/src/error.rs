//! Error types for raster building and persistence.

use thiserror::Error;

/// Errors that can occur while building, reading or persisting a raster.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(String),

    /// A tile file could not be parsed.
    #[error("tile format error in {source_name}: {message}")]
    TileFormat {
        source_name: String,
        message: String,
    },

    /// A tile or value buffer has the wrong number of cells.
    #[error("shape mismatch for {what}: expected {expected} cells, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// The snapshot stream is corrupt or was written by something else.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl RasterError {
    /// Create a TileFormat error.
    pub fn tile_format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TileFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Create a Snapshot error.
    pub fn snapshot(msg: impl Into<String>) -> Self {
        Self::Snapshot(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<std::io::Error> for RasterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
