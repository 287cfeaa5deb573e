//! HTTP server initialization and runtime setup.
//!
//! Handles the store connection, migrations, cache invalidation wiring and the
//! Axum server lifecycle.

use crate::application::services::{AuthService, LinkService};
use crate::config::{Config, StorageBackend};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::build_dispatcher;
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{FixedInterval, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Cache invalidation dispatcher (HTTP, Redis, or disabled)
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails after all retries
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let link_repository: Arc<dyn LinkRepository> = match config.storage {
        StorageBackend::Postgres => {
            let pool = connect_database(&config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            Arc::new(PgLinkRepository::new(Arc::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory link store; links are lost on restart");
            Arc::new(MemoryLinkRepository::new())
        }
    };

    let dispatcher = build_dispatcher(&config.invalidation_settings())
        .await
        .context("Failed to initialize cache invalidation")?;

    let link_service = LinkService::new(link_repository, dispatcher, config.link_policy());
    let auth_service = AuthService::new(&config.jwt_secret);
    let state = AppState::new(link_service, auth_service);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Opens the connection pool, retrying while the database comes up.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = FixedInterval::from_millis(config.db_retry_delay_ms)
        .map(jitter)
        .take(config.db_connect_retries);

    let mut attempt = 0u32;
    Retry::start(strategy, || {
        attempt += 1;
        let options = options.clone();
        async move {
            options
                .connect(&config.database_url)
                .await
                .inspect_err(|e| tracing::warn!(attempt, error = %e, "Database connection failed"))
        }
    })
    .await
    .context("Failed to connect to database")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
