//! popgrid API server

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use popgrid_api::config::ServiceConfig;
use popgrid_api::state::AppState;

/// popgrid API server
#[derive(Parser, Debug)]
#[command(name = "popgrid-api")]
#[command(about = "Population totals and heatmaps for convex polygons")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "POPGRID_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "POPGRID_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Optional YAML config file
    #[arg(short, long, env = "POPGRID_CONFIG")]
    config: Option<PathBuf>,

    /// Snapshot written by the preprocessor (overrides the config file)
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting popgrid API server");

    let mut config = match &args.config {
        Some(path) => ServiceConfig::load_from_file(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env()?;
    if let Some(snapshot) = args.snapshot {
        config.snapshot_path = snapshot;
    }
    config.validate()?;
    info!(
        snapshot = %config.snapshot_path.display(),
        cell_strategy = %config.cell_strategy,
        max_grid_cells = config.max_grid_cells,
        "Service configuration"
    );

    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let state = Arc::new(AppState::load(config).await?);
    popgrid_api::metrics::record_store(&state.store);

    let app = popgrid_api::router(state, prometheus);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("popgrid API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
