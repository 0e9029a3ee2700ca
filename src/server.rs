//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, worker spawning, and the Axum
//! server lifecycle including graceful shutdown.

use crate::application::services::{
    LinkService, OAuthService, RedirectService, SessionService, UserService,
};
use crate::config::Config;
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::identity::GoogleIdentityProvider;
use crate::infrastructure::persistence::{
    PgBlockRepository, PgLinkRepository, PgSessionRepository, PgUserRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (bounded, tuned from config)
/// - Migrations
/// - Supervised visit audit worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if the database connection, migration run, or server
/// bind fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let store_timeout = Duration::from_secs(config.store_timeout_seconds);
    let pool_arc = Arc::new(pool.clone());

    let link_repository = Arc::new(PgLinkRepository::new(pool_arc.clone(), store_timeout));
    let block_repository = Arc::new(PgBlockRepository::new(pool_arc.clone(), store_timeout));
    let user_repository = Arc::new(PgUserRepository::new(pool_arc.clone(), store_timeout));
    let session_repository = Arc::new(PgSessionRepository::new(pool_arc.clone(), store_timeout));

    let link_service = Arc::new(LinkService::new(
        link_repository.clone(),
        block_repository.clone(),
        config.base_url.clone(),
    ));
    let redirect_service = Arc::new(RedirectService::new(link_repository, block_repository));
    let session_service = Arc::new(SessionService::new(
        user_repository.clone(),
        session_repository,
        config.session_ttl_days,
    ));
    let user_service = Arc::new(UserService::new(user_repository.clone()));
    let identity_provider = Arc::new(GoogleIdentityProvider::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        &config.base_url,
    ));
    let oauth_service = Arc::new(OAuthService::new(
        user_repository,
        session_service.clone(),
        identity_provider,
    ));

    let (visit_tx, visit_rx) = mpsc::channel(config.visit_queue_capacity);

    // The worker never takes the serving process down with it: a panic is
    // observed by the supervising task, reported, and request handling
    // continues without the audit trail.
    let worker = tokio::spawn(run_visit_worker(visit_rx));
    tokio::spawn(async move {
        if let Err(err) = worker.await {
            tracing::error!(error = %err, "visit worker terminated abnormally");
        }
    });
    tracing::info!("Visit worker started");

    let state = AppState {
        db: pool,
        link_service,
        redirect_service,
        session_service,
        user_service,
        oauth_service,
        visit_sender: visit_tx,
    };

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

    Ok(())
}

/// Completes when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
