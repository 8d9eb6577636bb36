//! Replay Ranking Engine
//!
//! Ranking backend of the Replay community events site: related-recordings
//! selection and the global trending ordering, served over a small REST API.
//!
//! # Architecture
//!
//! - **Catalog Store**: immutable recording snapshot, loaded once at startup
//! - **Ranking**: pure related/trending selectors over the snapshot
//! - **Like Count Provider**: external likes service, failure-tolerant
//! - **API Server**: REST endpoints for frontend consumption
//!
//! # Graceful Shutdown
//!
//! Handles SIGTERM and SIGINT, letting in-flight requests complete.

use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod catalog;
mod config;
mod error;
mod likes;
mod ranking;

use catalog::CatalogStore;
use config::Config;
use error::Result;
use likes::HttpLikeProvider;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Replay Ranking Engine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;

    // Create shutdown channel
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Build the catalog snapshot once, up front; the store guarantees the
    // source is read at most once per process lifetime.
    let store = CatalogStore::new();
    let catalog_path = config.catalog.path.clone();
    let catalog = store.get_or_load(|| catalog::load_records_from_path(&catalog_path))?;
    info!("Catalog snapshot ready: {} recordings", catalog.len());

    // Like provider is optional; trending degrades to zero counts without it.
    let provider = match &config.likes.endpoint {
        Some(endpoint) => Some(HttpLikeProvider::new(
            endpoint.clone(),
            config.likes.request_timeout,
        )?),
        None => {
            warn!("No likes endpoint configured; trending will use zero counts");
            None
        }
    };

    let state = Arc::new(api::AppState {
        catalog,
        likes: provider,
        ranking: config.ranking.clone(),
    });

    // Spawn API server
    info!("Starting API server on port {}...", config.api.port);
    let mut handle = spawn_api_server(state, config.api.clone(), shutdown_tx.clone());

    // Wait for shutdown signal or server failure
    let mut server_done = false;
    tokio::select! {
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        _ = &mut handle => {
            server_done = true;
            warn!("API server exited, shutting down");
        }
    }

    // Graceful shutdown
    let _ = shutdown_tx.send(());
    if !server_done
        && tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .is_err()
    {
        warn!("Shutdown timeout exceeded, forcing exit");
    }

    info!("Replay Ranking Engine stopped gracefully");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("replay_engine=debug,tower_http=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .init();
}

/// Spawn the API server
fn spawn_api_server(
    state: Arc<api::AppState>,
    api_config: config::ApiConfig,
    shutdown_tx: broadcast::Sender<()>,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        tokio::select! {
            result = api::start_server(state, &api_config) => {
                if let Err(e) = result {
                    error!("API server error: {:?}", e);
                }
            }
            _ = shutdown_rx.recv() => {
                info!("API server shutting down");
            }
        }
    })
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
