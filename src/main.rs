//! FileDock Server: file and folder management over an object store.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use filedock_api::{AppState, build_router};
use filedock_core::config::{AppConfig, StorageProviderKind};
use filedock_core::error::AppError;
use filedock_database::DatabasePool;
use filedock_database::repositories::{
    FileRepository, FolderRepository, MemoryFileRepository, MemoryFolderRepository,
    PgFileRepository, PgFolderRepository,
};

#[tokio::main]
async fn main() {
    let env = std::env::var("FILEDOCK_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging. `RUST_LOG` wins over the configured level.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FileDock v{}", env!("CARGO_PKG_VERSION"));

    // ── Repositories ─────────────────────────────────────────────
    let (database, files, folders): (
        Option<DatabasePool>,
        Arc<dyn FileRepository>,
        Arc<dyn FolderRepository>,
    ) = if config.storage.provider == StorageProviderKind::Memory {
        tracing::warn!("Memory profile: records and payloads live only as long as the process");
        (
            None,
            Arc::new(MemoryFileRepository::new()),
            Arc::new(MemoryFolderRepository::new()),
        )
    } else {
        let pool = DatabasePool::connect(&config.database).await?;
        if config.database.run_migrations {
            filedock_database::migration::run_migrations(pool.pool()).await?;
        }
        (
            Some(pool.clone()),
            Arc::new(PgFileRepository::new(pool.pool().clone())),
            Arc::new(PgFolderRepository::new(pool.pool().clone())),
        )
    };

    // ── Object store ─────────────────────────────────────────────
    if config.storage.provider == StorageProviderKind::Local
        && config.storage.local.uses_default_secret()
    {
        tracing::warn!("storage.local.signing_secret is the shipped default; download links are forgeable");
    }
    let blobs = filedock_storage::connect(&config.storage).await?;

    // ── HTTP server ──────────────────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, files, folders, blobs, database.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("FileDock server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    let deadline = async move {
        let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        () = deadline => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Open connections outlived the shutdown grace period");
        }
    }

    if let Some(pool) = database {
        pool.close().await;
    }

    tracing::info!("FileDock server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
