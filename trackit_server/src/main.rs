//! trackit HTTP server binary.
//!
//! Opens the disk-backed store (with bounded startup backoff), builds the
//! router, and serves until ctrl-c.

mod error;
mod response;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use trackit_core::storage::DiskStorage;
use trackit_core::{Store, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,trackit_core=debug,trackit_server=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let listen = env_or("TRACKIT_LISTEN", "0.0.0.0:8000");
    let data_dir = env_or("TRACKIT_DATA_DIR", "./trackit_data");

    tracing::info!("trackit server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("data directory: {}", data_dir);
    tracing::info!("listen address: {}", listen);

    let store = match open_with_retry(&data_dir).await {
        Ok(store) => Arc::new(RwLock::new(store)),
        Err(err) => {
            tracing::error!(%err, "retry cap reached opening the store");
            std::process::exit(1);
        }
    };

    let app = routes::router(store);

    let listener = match tokio::net::TcpListener::bind(&listen).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(%err, "failed to bind {listen}");
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {}", listen);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%err, "server error");
        std::process::exit(1);
    }

    tracing::info!("server stopped");
}

/// Opens the store, retrying on backend failure with a bounded backoff
/// schedule before giving up.
async fn open_with_retry(data_dir: &str) -> Result<Store<DiskStorage>, StoreError> {
    let mut last_err = None;
    for sleepsecs in [1u64, 2, 4, 10] {
        match Store::open(data_dir) {
            Ok(store) => return Ok(store),
            Err(err) => {
                tracing::warn!(%err, "could not open store, retrying in {sleepsecs}s");
                last_err = Some(err);
                tokio::time::sleep(Duration::from_secs(sleepsecs)).await;
            }
        }
    }
    Err(last_err.unwrap_or_else(|| StoreError::Backend("store never opened".into())))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("received ctrl-c, shutting down");
}
