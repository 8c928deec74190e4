//! Task, progress and rewards tracker server.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `file` (default) | `in_memory`
//! - `DATA_FILE`: JSON document path (default: `data.json`)
//! - `SCHEMA_REVISION`: `tasks` | `progress` | `rewards` | `bulk` | `timestamped` (default)
//! - `SERIALIZE_WRITES`: serialize read-modify-write sequences (default: `false`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `tasklevels=debug`)
//! - `LOG_FORMAT`: `json` for JSON log lines (default: human-readable)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `5000`)
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)

use std::env;
use std::net::SocketAddr;
use std::num::NonZeroUsize;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklevels::api::{AppState, build_router};
use tasklevels::infrastructure::StoreFactory;

#[derive(Debug, Error, PartialEq, Eq)]
enum WorkerThreadsError {
    #[error("WORKER_THREADS must be greater than zero")]
    Zero,
    #[error("WORKER_THREADS='{0}' is not a number")]
    NotANumber(String),
}

/// Parses a `WORKER_THREADS` value. Blank means the runtime default.
fn parse_worker_threads(raw: &str) -> Result<Option<NonZeroUsize>, WorkerThreadsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let threads = trimmed
        .parse::<usize>()
        .map_err(|_| WorkerThreadsError::NotANumber(trimmed.to_string()))?;
    NonZeroUsize::new(threads)
        .map(Some)
        .ok_or(WorkerThreadsError::Zero)
}

/// Builds the multi-threaded runtime. An invalid `WORKER_THREADS` falls back
/// to the default with a warning on stderr, since tracing is not up yet.
fn build_runtime() -> std::io::Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if let Ok(raw) = env::var("WORKER_THREADS") {
        match parse_worker_threads(&raw) {
            Ok(Some(threads)) => {
                builder.worker_threads(threads.get());
            }
            Ok(None) => {}
            Err(error) => eprintln!("Warning: {error}, using default"),
        }
    }

    builder.build()
}

fn main() {
    dotenvy::dotenv().ok();

    match build_runtime() {
        Ok(runtime) => runtime.block_on(async_main()),
        Err(error) => {
            eprintln!("Failed to create tokio runtime: {error}");
            std::process::exit(1);
        }
    }
}

fn wants_json_logs(format: Option<&str>) -> bool {
    format.is_some_and(|format| format.trim().eq_ignore_ascii_case("json"))
}

/// Installs the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let json = wants_json_logs(env::var("LOG_FORMAT").ok().as_deref());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklevels=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

async fn async_main() {
    init_tracing();

    tracing::info!("Starting tasklevels");

    let factory = match StoreFactory::from_env() {
        Ok(factory) => factory,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    let config = factory.config().clone();
    tracing::info!(
        storage_mode = ?config.storage_mode,
        data_file = ?factory.data_file(),
        revision = %config.revision,
        serialize_writes = config.serialize_writes,
        "Store configuration loaded"
    );

    let store = match factory.create() {
        Ok(store) => store,
        Err(error) => {
            tracing::error!("Failed to initialize document store: {}", error);
            std::process::exit(1);
        }
    };

    if !config.serialize_writes {
        tracing::warn!(
            "SERIALIZE_WRITES is off: concurrent mutating requests may overwrite each other"
        );
    }

    let application = build_router(AppState::from_config(store, &config));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(5000);

    let address: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, "Invalid server address: {}:{}", host, port);
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    if let Err(error) = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes on SIGINT, or on SIGTERM where supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
