//! Folio server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use folio_core::config::AppConfig;
use folio_registry::SqliteStore;
use folio_registry::store::RegistryStore;
use folio_server::{AppState, create_router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interval for sweeping idle per-parent lock entries.
const LOCK_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Folio - an ordered media-asset service
#[derive(Parser, Debug)]
#[command(name = "foliod")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "FOLIO_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Folio v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();

    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    // Check for FOLIO_ environment variables (excluding FOLIO_CONFIG which is just the path)
    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("FOLIO_") && key != "FOLIO_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: foliod --config /path/to/config.toml\n  \
             2. Environment variables: FOLIO_SERVER__BIND=0.0.0.0:8080 \
             FOLIO_STORAGE__TYPE=filesystem FOLIO_STORAGE__PATH=/var/lib/folio foliod\n\n\
             See config/server.example.toml for example configuration.\n\
             Set FOLIO_CONFIG env var to specify a default config file path."
        );
    }

    if !has_config_file {
        tracing::info!("Using environment variables for configuration");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("FOLIO_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Register Prometheus metrics
    folio_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    // Initialize storage backend
    let storage = folio_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage")?;
    tracing::info!("Storage backend initialized");

    // Verify storage connectivity before accepting requests.
    // This catches configuration errors and connectivity issues early,
    // preventing the server from reporting healthy when storage is unreachable.
    storage
        .health_check()
        .await
        .context("storage health check failed")?;
    tracing::info!("Storage backend connectivity verified");

    // Initialize the asset registry
    let registry: Arc<dyn RegistryStore> = Arc::new(
        SqliteStore::new(&config.registry.path)
            .await
            .context("failed to initialize registry")?,
    );
    registry
        .health_check()
        .await
        .context("registry health check failed")?;
    tracing::info!(path = %config.registry.path.display(), "Asset registry initialized");

    // Create application state
    let state = AppState::new(config.clone(), storage, registry);

    // Keep the lock maps from accumulating idle entries
    folio_server::locks::spawn_sweep_task(state.locks.clone(), LOCK_SWEEP_INTERVAL);
    folio_server::locks::spawn_sweep_task(state.blob_locks.clone(), LOCK_SWEEP_INTERVAL);

    // Spawn the orphaned-blob sweep if enabled
    if folio_server::gc::spawn_gc_task(state.clone()).is_some() {
        tracing::info!(
            interval_secs = config.gc.interval_secs,
            grace_secs = config.gc.grace_secs,
            "Orphan sweep task spawned"
        );
    } else {
        tracing::info!("Orphan sweep disabled");
    }

    // Create router
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
