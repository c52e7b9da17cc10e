//! Mortgage Calculator - memoized mortgage calculation service
//!
//! # Startup Sequence
//! 1. Parse CLI flags and load configuration
//! 2. Initialize tracing for the configured environment
//! 3. Create the store, repository and calculator
//! 4. Start the background expiry sweeper
//! 5. Serve the Axum router until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use mortgage_calculator::{
    api::create_router, spawn_sweeper, telemetry::init_tracing, AppState, Config,
};

#[derive(Debug, Parser)]
#[command(version, about = "Mortgage calculator with a memoizing in-memory cache")]
struct Cli {
    /// Path to a YAML config file; environment variables are used when absent
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_tracing(config.env).context("failed to initialize tracing")?;

    info!(
        env = %config.env,
        port = config.server_port,
        cache_ttl = config.cache_ttl,
        sweep_interval = config.sweep_interval,
        "configuration loaded"
    );

    let state = AppState::from_config(&config);
    let sweeper = spawn_sweeper(state.repository(), config.sweep_interval);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(sweeper: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweeper.abort();
    warn!("Cache sweeper aborted");
}
