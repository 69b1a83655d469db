use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use daily_pulse_api::config::ServerConfig;
use daily_pulse_api::{create_app, AppState};
use daily_pulse_data::database::{
    get_connection_info, initialize_database_pool, DatabaseConfig, DatabaseType,
};
use daily_pulse_data::repository::DocumentRepository;

/// The main entry point for the Daily Pulse API server
///
/// This function:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for logging
/// 3. Opens the document store (SQLite, or in-memory as a fallback)
/// 4. Creates and starts the Axum web application
/// 5. Handles graceful shutdown
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("Starting Daily Pulse API server");

    let server_config = ServerConfig::from_env().context("invalid server configuration")?;
    let db_config = DatabaseConfig::from_env().context("invalid database configuration")?;

    let repository = open_repository(&db_config);
    let app = create_app(AppState::from_repository(repository));

    let addr = server_config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {} ({})", addr, server_config.environment);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Open the configured backend. A SQLite store that cannot be opened falls
/// back to memory so the service still starts.
fn open_repository(config: &DatabaseConfig) -> DocumentRepository {
    match config.db_type {
        DatabaseType::Memory => {
            info!("Using in-memory document store");
            DocumentRepository::in_memory()
        }
        DatabaseType::Sqlite => match initialize_database_pool(config) {
            Ok(pool) => {
                info!("Using {}", get_connection_info(&pool));
                DocumentRepository::with_pool(pool)
            }
            Err(e) => {
                warn!("Failed to initialize SQLite store: {}. Falling back to in-memory storage", e);
                DocumentRepository::in_memory()
            }
        },
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
