use rusqlite::Connection;
use tracing::info;

use crate::database::DatabaseError;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    create_documents_table(conn)?;
    create_documents_index(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the documents table
///
/// `path` is the full document key. The split key columns are kept for
/// ad-hoc inspection; lookups always go through `path`.
fn create_documents_table(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating documents table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            path TEXT PRIMARY KEY,
            collection TEXT NOT NULL,
            user_id TEXT NOT NULL,
            doc_date TEXT,
            body TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    ).map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(())
}

/// Create index for per-user, per-day lookups
fn create_documents_index(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating index on collection, user_id, doc_date");

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_owner_date
        ON documents (collection, user_id, doc_date)",
        [],
    ).map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    Ok(())
}
