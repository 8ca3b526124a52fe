//! iprep-server - Interview-prep problem tracker
//!
//! Serves the problem store, CSV ingestion, analytics, and export over HTTP.
//! State is in memory only; an optional seed CSV is loaded at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use iprep_common::config::{resolve_config_path, ConfigOverrides, ServiceConfig, TomlConfig};
use iprep_common::ProblemStore;
use iprep_server::{build_router, seed, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for iprep-server
#[derive(Parser, Debug)]
#[command(name = "iprep-server")]
#[command(about = "Interview-prep problem tracker")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "IPREP_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "IPREP_BIND")]
    bind: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file to load into the store at startup
    #[arg(long, env = "IPREP_SEED_CSV")]
    seed_csv: Option<PathBuf>,

    /// Key that unlocks editing in the UI
    #[arg(long, env = "IPREP_EDIT_KEY", hide_env_values = true)]
    edit_key: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "IPREP_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing is up so the file can set the log level
    let config_path = resolve_config_path(args.config.as_deref());
    let toml_config = TomlConfig::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(
        ConfigOverrides {
            bind: args.bind,
            port: args.port,
            edit_key: args.edit_key,
            seed_csv: args.seed_csv,
            log_level: args.log_level,
        },
        toml_config,
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting iprep-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) if path.exists() => info!("Config file: {}", path.display()),
        Some(path) => tracing::warn!("Config file not found: {} (using defaults)", path.display()),
        None => info!("No config file, using defaults"),
    }

    let mut store = ProblemStore::new();
    if let Some(path) = &config.seed_csv {
        seed::load_seed_csv(path, &config.normalize_rules, &mut store);
    }
    info!("Problem store ready ({} problems)", store.active_count());

    let state = AppState::new(store, config.normalize_rules.clone(), config.edit_key.clone());
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("iprep-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
