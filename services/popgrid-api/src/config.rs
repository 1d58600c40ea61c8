//! Service configuration.
//!
//! Values come from an optional YAML file, then `POPGRID_*` environment
//! variables override individual fields.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use aggregation::CellStrategy;
use projection::ProjectionKind;
use raster_store::RasterConfig;

/// Default cap on heatmap cells per grid request.
pub const DEFAULT_MAX_GRID_CELLS: u64 = 1_000_000;

/// Runtime configuration for the API service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Snapshot written by the preprocessor.
    pub snapshot_path: PathBuf,

    /// How relevant heatmap cells are valued.
    pub cell_strategy: CellStrategy,

    /// Largest heatmap (rows * cols) a single request may ask for.
    pub max_grid_cells: u64,

    /// Projection used by `/api/project` when the request names none.
    pub projection: ProjectionKind,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: RasterConfig::default().snapshot_path,
            cell_strategy: CellStrategy::default(),
            max_grid_cells: DEFAULT_MAX_GRID_CELLS,
            projection: ProjectionKind::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                "Config file {} does not exist, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse service config: {:?}", path))?;

        tracing::info!("Loaded service config from {:?}", path);
        Ok(config)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `POPGRID_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("POPGRID_SNAPSHOT_PATH") {
            self.snapshot_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("POPGRID_CELL_STRATEGY") {
            self.cell_strategy = val
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("POPGRID_CELL_STRATEGY")?;
        }

        if let Ok(val) = std::env::var("POPGRID_MAX_GRID_CELLS") {
            self.max_grid_cells = val
                .parse()
                .with_context(|| format!("POPGRID_MAX_GRID_CELLS is not a number: {}", val))?;
        }

        if let Ok(val) = std::env::var("POPGRID_PROJECTION") {
            self.projection = val.parse().context("POPGRID_PROJECTION")?;
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_grid_cells == 0 {
            bail!("max_grid_cells must be > 0");
        }
        if self.snapshot_path.as_os_str().is_empty() {
            bail!("snapshot_path must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.cell_strategy, CellStrategy::FullCell);
        assert_eq!(config.max_grid_cells, DEFAULT_MAX_GRID_CELLS);
        assert_eq!(config.projection, ProjectionKind::Linear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServiceConfig::load_from_file(Path::new("/nonexistent/popgrid.yaml")).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cell_strategy: clipped").unwrap();
        writeln!(file, "max_grid_cells: 500").unwrap();

        let config = ServiceConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.cell_strategy, CellStrategy::Clipped);
        assert_eq!(config.max_grid_cells, 500);
        assert_eq!(config.snapshot_path, ServiceConfig::default().snapshot_path);
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cell_strategy: sideways").unwrap();
        assert!(ServiceConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_zero_cell_limit_rejected() {
        let config = ServiceConfig {
            max_grid_cells: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
