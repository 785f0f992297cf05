//! AuthGate Server: credential verification and dual-token sessions.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use authgate_api::{AppState, build_app};
use authgate_auth::{
    MemoryRefreshTokenStore, MemoryUserStore, PgRefreshTokenStore, PgUserStore,
    RefreshTokenStore, SessionService, UserStore,
};
use authgate_core::config::{AppConfig, LoggingConfig, StoreProvider};
use authgate_core::error::{AppError, ErrorKind};
use authgate_database::DatabasePool;
use authgate_database::migration::run_migrations;
use authgate_database::repositories::{RefreshTokenRepository, UserRepository};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config).await {
        error!(kind = %e.kind, error = %e.message, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("AUTHGATE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
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
    info!("Starting AuthGate v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.access_token_secret.starts_with("CHANGE_ME")
        || config.auth.refresh_token_secret.starts_with("CHANGE_ME")
    {
        warn!("Token signing secrets are still set to their placeholder values");
    }

    // ── Step 1: Storage ──────────────────────────────────────────
    info!(provider = %config.database.provider, "Initializing stores");
    let (users, refresh_tokens, db_pool): (
        Arc<dyn UserStore>,
        Arc<dyn RefreshTokenStore>,
        Option<DatabasePool>,
    ) = match config.database.provider {
        StoreProvider::Postgres => {
            let db_pool = DatabasePool::connect(&config.database).await?;
            run_migrations(db_pool.pool()).await?;
            (
                Arc::new(PgUserStore::new(UserRepository::new(db_pool.pool().clone()))),
                Arc::new(PgRefreshTokenStore::new(RefreshTokenRepository::new(
                    db_pool.pool().clone(),
                ))),
                Some(db_pool),
            )
        }
        StoreProvider::Memory => {
            warn!("Using in-memory stores; accounts and sessions are lost on restart");
            (
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryRefreshTokenStore::new()),
                None,
            )
        }
    };

    // ── Step 2: Session service ──────────────────────────────────
    let session_service = Arc::new(SessionService::from_config(
        &config.auth,
        users,
        refresh_tokens,
    )?);
    session_service.warm_up().await?;

    // ── Step 3: HTTP server ──────────────────────────────────────
    let addr = config.server.bind_address();
    let app = build_app(AppState::new(Arc::new(config), session_service));

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;

    info!(address = %addr, "AuthGate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    if let Some(db_pool) = db_pool {
        db_pool.close().await;
    }

    info!("AuthGate stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
