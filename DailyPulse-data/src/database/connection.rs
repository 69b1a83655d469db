//! Database connection module for the Daily Pulse service
//!
//! Two storage backends are supported:
//! - SQLite (default), pooled through r2d2
//! - In-process memory, for tests and as a fallback when SQLite is unavailable
//!
//! The pool is created once at startup and handed to the repository. There is
//! no process-wide pool.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;
use tracing::info;

use super::migrations::run_sqlite_migrations;

/// Default on-disk location of the SQLite database
pub const DEFAULT_SQLITE_PATH: &str = "data/daily_pulse.db";

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
    /// Documents kept in process memory, lost on restart
    Memory,
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            "memory" | "in-memory" | "inmemory" => Ok(DatabaseType::Memory),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    SqlitePoolError(#[from] r2d2::Error),

    /// Filesystem error while preparing the database location
    #[error("Database file error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Invalid configuration value
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Storage backend
    pub db_type: DatabaseType,
    /// Path to SQLite database file
    pub sqlite_path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let db_type = match env::var("DB_TYPE") {
            Ok(value) => value.parse::<DatabaseType>()?,
            Err(_) => defaults.db_type,
        };

        let sqlite_path = env::var("DB_SQLITE_PATH").unwrap_or(defaults.sqlite_path);

        let max_connections = parse_env("DB_MAX_CONNECTIONS", defaults.max_connections)?;
        let timeout_seconds = parse_env("DB_TIMEOUT_SECONDS", defaults.timeout_seconds)?;

        if max_connections == 0 {
            return Err(DatabaseError::ConfigError(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        info!(
            "Database configuration: type={:?}, max_connections={}, timeout={}s",
            db_type, max_connections, timeout_seconds
        );

        Ok(DatabaseConfig {
            db_type,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }

    /// SQLite configuration pointing at `path`, other settings left at defaults
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            sqlite_path: path.into(),
            ..Self::default()
        }
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, DatabaseError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| DatabaseError::ConfigError(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

/// Pooled SQLite connections
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: r2d2::Pool<SqliteConnectionManager>,
}

impl DatabasePool {
    /// Check out a connection
    pub fn get(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, r2d2::Error> {
        self.pool.get()
    }

    /// Active and idle connection counts
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }
}

/// Open the SQLite database described by `config` and run migrations
pub fn initialize_database_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    if config.db_type != DatabaseType::Sqlite {
        return Err(DatabaseError::UnsupportedDatabaseType(format!(
            "{:?} does not use a connection pool",
            config.db_type
        )));
    }

    info!("Initializing SQLite database at: {}", config.sqlite_path);

    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent)?;
        }
    }

    let busy_timeout = Duration::from_secs(config.timeout_seconds);
    let manager = SqliteConnectionManager::file(&config.sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
        .with_init(move |conn| conn.busy_timeout(busy_timeout));

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    let conn = pool.get()?;
    run_sqlite_migrations(&conn)?;

    info!("SQLite connection pool created successfully");
    Ok(DatabasePool { pool })
}

/// Describe the database behind `pool` for health reporting
pub fn get_connection_info(pool: &DatabasePool) -> String {
    let location = pool
        .get()
        .ok()
        .and_then(|conn| {
            conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2))
                .ok()
        })
        .map(|path| {
            if path.is_empty() {
                "SQLite in-memory database".to_string()
            } else {
                format!("SQLite database at {}", path)
            }
        })
        .unwrap_or_else(|| "SQLite database (path unknown)".to_string());

    let state = pool.state();
    format!(
        "{} (connections: active={}, idle={})",
        location, state.connections, state.idle_connections
    )
}
