use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use catalog_db::{MemoryRecordStore, PgRecordStore, RecordStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_api::config::{ConfigError, LogFormat, ServerConfig, StorageBackend};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;

    // --- Tracing ---
    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "catalog_api=debug,catalog_db=debug,tower_http=debug".into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
    tracing::info!(
        host = %config.host,
        port = config.port,
        storage = ?config.storage,
        "Loaded server configuration",
    );

    // --- Storage ---
    let store = open_store(&config).await?;

    // --- Router ---
    let app = build_app_router(AppState::new(Arc::clone(&store)), &config)?;

    if running_in_lambda() {
        tracing::info!("Running under the Lambda runtime");
        let result = serve_lambda(app).await;
        close_store(store.as_ref(), &config).await;
        return result;
    }

    // --- Start server ---
    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .with_context(|| format!("Invalid HOST address {:?}", config.host))?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    close_store(store.as_ref(), &config).await;
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

/// Open the configured storage backend.
///
/// For PostgreSQL this connects the pool, checks connectivity, and applies
/// pending migrations before any request is served.
async fn open_store(config: &ServerConfig) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; records are lost on restart");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::MissingDatabaseUrl)?;

            let pool = catalog_db::create_pool(database_url, config.db_max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            catalog_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            catalog_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgRecordStore::new(pool)))
        }
    }
}

fn running_in_lambda() -> bool {
    cfg!(feature = "lambda") && std::env::var_os("AWS_LAMBDA_RUNTIME_API").is_some()
}

/// Hand the router to the Lambda runtime; returns when the runtime stops.
#[cfg(feature = "lambda")]
async fn serve_lambda(app: axum::Router) -> anyhow::Result<()> {
    lambda_http::run(app).await.map_err(|e| anyhow::anyhow!(e))
}

#[cfg(not(feature = "lambda"))]
async fn serve_lambda(_app: axum::Router) -> anyhow::Result<()> {
    anyhow::bail!("built without the `lambda` feature")
}

/// Close the store, giving up after `SHUTDOWN_TIMEOUT_SECS`.
async fn close_store(store: &dyn RecordStore, config: &ServerConfig) {
    let timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(timeout, store.close()).await.is_err() {
        tracing::warn!(?timeout, "Timed out closing the store");
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). If a handler cannot
/// be installed, that branch never resolves and the other still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
