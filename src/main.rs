//! Mini Cache - a replicated in-memory LRU cache server
//!
//! Process bootstrap: load configuration, recover state from the
//! write-ahead log, attach the log for appending, start replication
//! workers when running as a primary, and serve until shutdown.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod replication;
mod wal;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use cache::{Cache, LruStore};
use config::Config;
use replication::ReplicationWorkers;
use wal::WalWriter;

/// How long shutdown waits for the replication queues to drain.
const REPLICATION_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing subscriber with env filter.
    // Defaults to "info" level, can be overridden with RUST_LOG.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Cache Server");

    // Config file path: first CLI argument, else env var, else default.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MINI_CACHE_CONFIG").ok())
        .unwrap_or_else(|| "cache.conf".to_string());
    let config = Config::load(&PathBuf::from(&config_path));
    info!(
        "Configuration loaded: listen={}, capacity={}, ttl={}s, log={}, replicas={}",
        config.listen_address,
        config.capacity,
        config.ttl_seconds,
        config.log_file.display(),
        config.replica_addresses.len()
    );

    // Recover state from the log before anything can mutate the cache.
    let mut store = LruStore::new(config.capacity, config.ttl_seconds);
    match wal::replay(&config.log_file, &mut store) {
        Ok(summary) => info!(
            puts = summary.puts,
            dels = summary.dels,
            skipped = summary.skipped,
            "recovery complete"
        ),
        Err(err) => {
            error!(error = %err, "failed to recover from log");
            return ExitCode::FAILURE;
        }
    }
    info!(keys = ?store.keys_mru_to_lru(), "cache state after recovery");

    // Open the log for appending only after replay, so recovered
    // mutations are never re-logged.
    let wal_writer = match WalWriter::open(&config.log_file, config.wal_fsync) {
        Ok(writer) => writer,
        Err(err) => {
            error!(path = %config.log_file.display(), error = %err, "could not open log for appending");
            return ExitCode::FAILURE;
        }
    };

    let cache = Cache::new(store);
    cache.attach_wal(wal_writer).await;

    // Primary role: forward accepted mutations to each replica.
    let workers: Option<ReplicationWorkers> = if config.is_primary() {
        info!(
            replicas = config.replica_addresses.len(),
            "operating in primary mode"
        );
        let (queue, workers) = replication::start_workers(
            &config.replica_addresses,
            Duration::from_millis(config.replication_deadline_ms),
        );
        cache.attach_replication(queue).await;
        Some(workers)
    } else {
        info!("operating in replica mode");
        None
    };

    let state = AppState::new(cache.clone());
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.listen_address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(address = %config.listen_address, error = %err, "failed to bind listener");
            return ExitCode::FAILURE;
        }
    };
    info!("Server listening on http://{}", config.listen_address);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    // Teardown order: stop producing replication tasks, let the workers
    // drain, then flush and release the log handle.
    cache.detach_replication().await;
    if let Some(workers) = workers {
        workers.shutdown(REPLICATION_SHUTDOWN_GRACE).await;
    }
    if let Some(wal_writer) = cache.detach_wal().await {
        if let Err(err) = wal_writer.close() {
            error!(error = %err, "failed to close log cleanly");
            return ExitCode::FAILURE;
        }
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
}
