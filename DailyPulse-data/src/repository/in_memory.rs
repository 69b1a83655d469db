use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use crate::models::{apply_write, Document, DocumentKey, SetOptions, WriteFields};
use super::errors::RepositoryError;

/// In-memory document storage
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    /// Documents by path
    documents: Arc<Mutex<HashMap<String, Document>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get a document from memory
    pub async fn get_document(&self, key: &DocumentKey) -> Result<Option<Document>, RepositoryError> {
        let store = self.documents.lock()?;
        Ok(store.get(&key.path()).cloned())
    }

    /// Apply a write to a document in memory
    ///
    /// The guard is held across read, resolve and store.
    pub async fn write_document(
        &self,
        key: &DocumentKey,
        fields: &WriteFields,
        options: SetOptions,
    ) -> Result<Document, RepositoryError> {
        let path = key.path();
        let mut store = self.documents.lock()?;

        let applied = apply_write(store.get(&path), fields, options, Utc::now())?;
        debug!("Stored document in memory: {} ({} fields)", path, applied.stored.len());
        store.insert(path, applied.stored);

        Ok(applied.resolved)
    }

    /// Number of stored documents
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.documents.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_document_is_none() {
        let storage = InMemoryStorage::new();
        let key = DocumentKey::dated("wearableData", "u1", "2024-03-15");

        assert!(storage.get_document(&key).await.unwrap().is_none());
        assert!(storage.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let storage = InMemoryStorage::new();
        let clone = storage.clone();
        let key = DocumentKey::user("users", "u1");

        clone
            .write_document(&key, &WriteFields::new().set("stepGoal", 10000), SetOptions::merge())
            .await
            .unwrap();

        let doc = storage.get_document(&key).await.unwrap().unwrap();
        assert_eq!(doc["stepGoal"], json!(10000));
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_isolated_by_date() {
        let storage = InMemoryStorage::new();
        let yesterday = DocumentKey::dated("foodLogs", "u1", "2024-03-14");
        let today = DocumentKey::dated("foodLogs", "u1", "2024-03-15");

        storage
            .write_document(&yesterday, &WriteFields::new().increment("calories", 500.0), SetOptions::merge())
            .await
            .unwrap();

        assert!(storage.get_document(&today).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_increment_keeps_stored_total() {
        let storage = InMemoryStorage::new();
        let key = DocumentKey::dated("foodLogs", "u1", "2024-03-15");
        let fields = WriteFields::new().increment("calories", 1e308);

        storage.write_document(&key, &fields, SetOptions::merge()).await.unwrap();
        let result = storage.write_document(&key, &fields, SetOptions::merge()).await;

        assert!(matches!(result, Err(RepositoryError::InvalidWrite(_))));
        let doc = storage.get_document(&key).await.unwrap().unwrap();
        assert_eq!(doc["calories"], json!(1e308));
    }
}
