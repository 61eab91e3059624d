//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring, background worker
//! spawning, and the Axum server lifecycle.

use crate::application::services::{AuthService, LinkService};
use crate::config::Config;
use crate::domain::session_sweeper::run_session_sweeper;
use crate::infrastructure::persistence::{
    PgLinkRepository, PgSessionRepository, PgUserRepository,
};
use crate::infrastructure::title_fetcher::HttpTitleFetcher;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use base64::Engine as _;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Schema migrations
/// - Repositories and services
/// - Background session sweeper
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let session_repository = Arc::new(PgSessionRepository::new(pool.clone()));

    let signing_secret = match &config.session_signing_secret {
        Some(secret) => secret.clone(),
        None => {
            tracing::warn!(
                "SESSION_SIGNING_SECRET is not set; using a generated secret \
                 (sessions will not survive a restart)"
            );
            generate_signing_secret()
        }
    };

    let link_service = Arc::new(LinkService::new(
        link_repository,
        Arc::new(HttpTitleFetcher::new()),
        config.base_url.clone(),
        config.title_fetch_timeout,
    ));
    let auth_service = Arc::new(AuthService::new(
        user_repository,
        session_repository.clone(),
        signing_secret,
        config.session_ttl,
    ));

    tokio::spawn(run_session_sweeper(
        session_repository,
        config.session_sweep_interval,
    ));
    tracing::info!("Session sweeper started");

    let state = AppState::new(link_service, auth_service);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Completes when Ctrl-C is received, letting in-flight requests finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {e}");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Generates a random per-process signing secret for development setups.
fn generate_signing_secret() -> String {
    let mut buffer = [0u8; 32];
    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
