use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::{apply_write, format_timestamp, Document, DocumentKey, SetOptions, WriteFields};
use super::errors::RepositoryError;

/// SQLite document storage
///
/// rusqlite is blocking, so every call runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct DatabaseStorage {
    pool: DatabasePool,
}

impl DatabaseStorage {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Get a document from the database
    pub async fn get_document(&self, key: &DocumentKey) -> Result<Option<Document>, RepositoryError> {
        let pool = self.pool.clone();
        let path = key.path();
        debug!("Getting document from database: {}", path);

        tokio::task::spawn_blocking(move || -> Result<Option<Document>, RepositoryError> {
            let conn = pool.get()?;
            select_document(&conn, &path)
        })
        .await?
    }

    /// Apply a write inside an IMMEDIATE transaction
    ///
    /// The write lock is taken before the existing body is read, so two
    /// concurrent increments on one document serialize instead of racing.
    pub async fn write_document(
        &self,
        key: &DocumentKey,
        fields: &WriteFields,
        options: SetOptions,
    ) -> Result<Document, RepositoryError> {
        let pool = self.pool.clone();
        let key = key.clone();
        let fields = fields.clone();
        debug!("Writing document to database: {} (merge={})", key, options.merge);

        tokio::task::spawn_blocking(move || -> Result<Document, RepositoryError> {
            let mut conn = pool.get()?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let path = key.path();
            let existing = select_document(&tx, &path)?;
            let now = Utc::now();
            let applied = apply_write(existing.as_ref(), &fields, options, now)?;
            let body = serde_json::to_string(&applied.stored)?;

            tx.execute(
                "INSERT INTO documents (path, collection, user_id, doc_date, body, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(path) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                params![
                    path,
                    key.collection,
                    key.user_id,
                    key.date,
                    body,
                    format_timestamp(now),
                ],
            )?;
            tx.commit()?;

            Ok(applied.resolved)
        })
        .await?
    }

    /// Round-trip a trivial query to confirm the database answers
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> Result<(), RepositoryError> {
            let conn = pool.get()?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
        .await?
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }
}

fn select_document(conn: &Connection, path: &str) -> Result<Option<Document>, RepositoryError> {
    let body = conn
        .query_row(
            "SELECT body FROM documents WHERE path = ?1",
            [path],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    match body {
        Some(body) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::tests::unique_db_path;
    use crate::database::{initialize_database_pool, DatabaseConfig};
    use serde_json::json;

    fn test_storage() -> (DatabaseStorage, String) {
        let path = unique_db_path("daily_pulse_storage");
        let pool = initialize_database_pool(&DatabaseConfig::sqlite(path.clone())).unwrap();
        (DatabaseStorage::new(pool), path)
    }

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let (storage, path) = test_storage();
        let key = DocumentKey::dated("wearableData", "u1", "2024-03-15");

        assert!(storage.get_document(&key).await.unwrap().is_none());
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_merge_write_round_trip() {
        let (storage, path) = test_storage();
        let key = DocumentKey::dated("foodLogs", "u1", "2024-03-15");

        storage
            .write_document(&key, &WriteFields::new().set("note", "from another writer"), SetOptions::merge())
            .await
            .unwrap();

        let fields = WriteFields::new()
            .set("photoUrl", "meal.jpg")
            .set("foods", json!(["oats"]))
            .increment("calories", 300.0)
            .server_timestamp("updatedAt");
        let resolved = storage.write_document(&key, &fields, SetOptions::merge()).await.unwrap();

        assert_eq!(resolved["calories"], json!(300));
        assert!(resolved["updatedAt"].is_string());
        assert!(resolved.get("note").is_none());

        let stored = storage.get_document(&key).await.unwrap().unwrap();
        assert_eq!(stored["note"], json!("from another writer"));
        assert_eq!(stored["foods"], json!(["oats"]));
        assert_eq!(stored["calories"], json!(300));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_document() {
        let (storage, path) = test_storage();
        let key = DocumentKey::dated("dailyPulse", "u1", "2024-03-15");

        storage
            .write_document(&key, &WriteFields::new().set("pulseMessage", "old").set("stale", true), SetOptions::overwrite())
            .await
            .unwrap();
        storage
            .write_document(&key, &WriteFields::new().set("pulseMessage", "new"), SetOptions::overwrite())
            .await
            .unwrap();

        let stored = storage.get_document(&key).await.unwrap().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored["pulseMessage"], json!("new"));

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_ping() {
        let (storage, path) = test_storage();
        storage.ping().await.unwrap();
        let _ = std::fs::remove_file(path);
    }
}
