//! IRRIGOS - Smart Irrigation Operational Intelligence
//!
//! Service backend for the irrigation dashboard: simulated sensor readings,
//! real-time weather, telemetry relay, and LLM-backed agronomy advice.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (requires the inference API key)
//! IRRIGOS_INFERENCE_API_KEY=... cargo run --release
//!
//! # Run with a config file
//! cargo run --release -- --config irrigos.toml
//! ```
//!
//! # Environment Variables
//!
//! - `IRRIGOS_INFERENCE_API_KEY`: inference service key (required)
//! - `IRRIGOS_TELEMETRY_WRITE_KEY`: telemetry channel write key
//! - `IRRIGOS_AUTH_USERNAME` / `IRRIGOS_AUTH_PASSWORD`: login credentials
//! - `IRRIGOS_CONFIG`: path to the TOML config file
//! - `RUST_LOG`: logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use irrigos::api::{create_app, DashboardState};
use irrigos::config::AppConfig;
use irrigos::i18n::Catalog;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "irrigos")]
#[command(about = "IRRIGOS Smart Irrigation Operational Intelligence Service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to the TOML configuration file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up a local .env before reading any configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  IRRIGOS - Smart Irrigation Operational Intelligence");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load and validate configuration. A missing inference key is fatal:
    // the process must not serve requests without it.
    let mut config = AppConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(addr) = args.addr {
        config.server.bind_address = addr;
    }
    if let Err(e) = config.validate() {
        error!("Startup aborted: {e}");
        return Err(e.into());
    }
    info!(model = %config.inference.model, "✓ Configuration validated");

    // Locale catalog: built-in strings plus an optional file
    let catalog = match &config.locale.catalog_path {
        Some(path) => Catalog::load(&config.locale.default_locale, std::path::Path::new(path))
            .context("Failed to load locale catalog")?,
        None => Catalog::builtin(&config.locale.default_locale),
    };

    // Graceful shutdown via Ctrl+C; the token also aborts in-flight
    // outbound client calls.
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let bind_address = config.server.bind_address.clone();
    let state = DashboardState::new(Arc::new(config), catalog, cancel_token.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {bind_address}"))?;

    info!("✓ HTTP server listening on {bind_address}");
    info!("🎯 Dashboard API available at: http://{bind_address}/api/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("HTTP server received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    info!("Graceful shutdown complete");
    Ok(())
}
