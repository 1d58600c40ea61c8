//! Application state for the popgrid API.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use raster_store::RasterStore;

use crate::config::ServiceConfig;

/// Shared application state.
pub struct AppState {
    /// Processed population raster, read-only after startup.
    pub store: Arc<RasterStore>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Wrap an already built store.
    pub fn new(store: RasterStore, config: ServiceConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Load the snapshot named by `config` off the async runtime.
    pub async fn load(config: ServiceConfig) -> Result<Self> {
        let path = config.snapshot_path.clone();
        info!(path = %path.display(), "Loading raster snapshot");

        let store = tokio::task::spawn_blocking(move || RasterStore::load(&path))
            .await
            .context("Snapshot loading task failed")?
            .with_context(|| {
                format!(
                    "Failed to load snapshot {:?}; run the preprocessor first",
                    config.snapshot_path
                )
            })?;

        info!(
            rows = store.dims().rows,
            cols = store.dims().cols,
            total_population = store.total(),
            "Raster snapshot ready"
        );
        Ok(Self::new(store, config))
    }
}
