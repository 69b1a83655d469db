use std::sync::PoisonError;
use thiserror::Error;
use crate::database::DatabaseError;
use crate::models::WriteError;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write rejected before anything was stored
    #[error("Invalid write: {0}")]
    InvalidWrite(#[from] WriteError),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),

    /// Blocking storage task failed to complete
    #[error("Storage task error: {0}")]
    TaskJoin(String),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}

impl From<tokio::task::JoinError> for RepositoryError {
    fn from(error: tokio::task::JoinError) -> Self {
        RepositoryError::TaskJoin(error.to_string())
    }
}
