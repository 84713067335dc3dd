//! Terraplane Server
//!
//! An async Rust server that executes Terraform commands on behalf of many
//! tenants sharing one worker fleet, with distributed per-(tenant, template)
//! locking, tenant-isolated workspaces, and an append-only execution ledger.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terraplane_core::{CommandRunner, WorkspaceManager};
use terraplane_server::{
    config::{AppConfig, DatabaseConfig, TerraformConfig},
    db::{create_pool, schema},
    handlers,
    services::{ArtifactFetcher, LedgerWriter, LockManager, TerraformService},
    state::AppState,
    stores::{HttpObjectStore, PgExecutionLedger, PgLockStore, PgTemplateStore},
    AppError,
};

/// Initialize tracing/logging.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,terraplane_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application router with all routes.
fn build_router(state: AppState) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .route("/api/process/execute", post(handlers::execute))
        .route(
            "/api/tenants/{tenant_id}/templates",
            get(handlers::templates::list),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Terraplane server"
    );

    // Load configuration
    let app_config = AppConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    let db_config = DatabaseConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load database config, using defaults");
        DatabaseConfig::default()
    });

    let terraform_config = TerraformConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load terraform config, using defaults");
        TerraformConfig::default()
    });

    terraform_config
        .validate()
        .map_err(AppError::Config)
        .map_err(anyhow::Error::from)?;

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        binary = %terraform_config.binary_path,
        workspace_dir = %terraform_config.base_directory,
        "Configuration loaded"
    );

    // Create database connection pool and ensure tables
    let db_pool = create_pool(&db_config).await?;
    schema::ensure_schema(&db_pool).await?;

    // Collaborator stores
    let lock_store = Arc::new(PgLockStore::new(db_pool.clone()));
    let template_store = Arc::new(PgTemplateStore::new(db_pool.clone()));
    let ledger_store = Arc::new(PgExecutionLedger::new(db_pool.clone()));
    let object_store = Arc::new(HttpObjectStore::new(&terraform_config.object_store_url));

    // Execution orchestrator
    let workspace = Arc::new(WorkspaceManager::new(
        &terraform_config.base_directory,
        terraform_config.max_cached_tenants,
    ));
    let terraform = Arc::new(TerraformService::new(
        LockManager::new(lock_store, terraform_config.lock_ttl_seconds),
        workspace,
        template_store.clone(),
        ArtifactFetcher::new(object_store, &terraform_config.bucket),
        LedgerWriter::new(ledger_store),
        CommandRunner::new(&terraform_config.binary_path),
        &terraform_config,
    ));

    // Create application state
    let state = AppState::new(db_pool, app_config.clone(), terraform, template_store);

    // Build the router
    let app = build_router(state);

    // Bind to address
    let addr: SocketAddr = app_config.bind_address().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
