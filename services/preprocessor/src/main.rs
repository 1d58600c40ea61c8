//! Raster preprocessor.
//!
//! Reads the raw population tiles, assembles the global raster, replaces
//! every row by its running sum and writes the compressed snapshot the API
//! service loads at startup.

mod ingest;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ingest::Preprocessor;
use raster_store::RasterConfig;

#[derive(Parser, Debug)]
#[command(name = "preprocessor")]
#[command(about = "Build the popgrid raster snapshot from ASCII tiles")]
struct Args {
    /// Directory holding the raw `.asc` tiles
    #[arg(long, env = "POPGRID_ASSETS_DIR")]
    assets_dir: Option<PathBuf>,

    /// Tile file name prefix; tiles are `{prefix}1.asc` .. `{prefix}8.asc`
    #[arg(long, env = "POPGRID_TILE_PREFIX")]
    prefix: Option<String>,

    /// Snapshot output path
    #[arg(short, long, env = "POPGRID_SNAPSHOT_PATH")]
    output: Option<PathBuf>,

    /// Tile edge length in cells
    #[arg(long)]
    tile_size: Option<usize>,

    /// Snapshot compression level (1-9)
    #[arg(long)]
    compression_level: Option<u32>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Environment-derived configuration with command-line overrides.
    fn into_config(self) -> RasterConfig {
        let mut config = RasterConfig::from_env();
        if let Some(dir) = self.assets_dir {
            config.assets_dir = dir;
        }
        if let Some(prefix) = self.prefix {
            config.tile_prefix = prefix;
        }
        if let Some(output) = self.output {
            config.snapshot_path = output;
        }
        if let Some(size) = self.tile_size {
            config.layout.tile_size = size;
        }
        if let Some(level) = self.compression_level {
            config.compression_level = level;
        }
        config
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting raster preprocessor");

    let config = args.into_config();
    config.validate()?;
    info!(
        assets_dir = %config.assets_dir.display(),
        prefix = %config.tile_prefix,
        output = %config.snapshot_path.display(),
        tile_size = config.layout.tile_size,
        "Loaded configuration"
    );

    let summary = Preprocessor::new(config).run()?;
    info!(
        tiles = summary.tiles,
        total_population = summary.total_population,
        elapsed_ms = summary.elapsed_ms,
        "Preprocessing complete"
    );

    Ok(())
}
