//! Contour API Server
//!
//! Turns uploaded maps into terrain textures and heightmaps.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use contour_api::build_router;
use contour_api::config::{ApiConfig, DEFAULT_MAX_UPLOAD_BYTES};
use contour_api::state::AppState;

/// Contour API Server
#[derive(Parser, Debug)]
#[command(name = "contour-api")]
#[command(about = "Map-to-terrain texture and heightmap service")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000", env = "CONTOUR_LISTEN_ADDR")]
    listen: String,

    /// Directory uploaded files are stored in
    #[arg(long, default_value = "./uploads", env = "CONTOUR_UPLOADS_DIR")]
    uploads_dir: PathBuf,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "CONTOUR_MAX_UPLOAD_BYTES")]
    max_upload_bytes: usize,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    info!("Prometheus metrics exporter initialized");

    let config = ApiConfig::from_env(args.listen, args.uploads_dir, args.max_upload_bytes);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!(
        listen = %config.listen,
        uploads_dir = %config.uploads_dir.display(),
        max_texture_dim = config.pipeline.max_texture_dim,
        heightmap_side = config.pipeline.heightmap_side,
        "Starting contour API server"
    );

    tokio::fs::create_dir_all(&config.uploads_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.uploads_dir.display()))?;

    let addr: SocketAddr = config.listen.parse()?;
    let state = Arc::new(AppState::new(config, Some(prometheus_handle))?);
    let app = build_router(state);

    info!(address = %addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
