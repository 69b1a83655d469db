use async_trait::async_trait;
use tracing::debug;

use crate::database::{get_connection_info, DatabasePool};
use crate::models::{Document, DocumentKey, SetOptions, WriteFields};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Repository trait for keyed documents
#[async_trait]
pub trait DocumentRepositoryTrait: Send + Sync {
    /// Get the document stored under `key`; an absent document is empty
    async fn get(&self, key: &DocumentKey) -> Result<Document, RepositoryError>;

    /// Write `fields` to `key` and return them with sentinels resolved
    async fn set(
        &self,
        key: &DocumentKey,
        fields: WriteFields,
        options: SetOptions,
    ) -> Result<Document, RepositoryError>;

    /// Check that the storage backend is reachable
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Human readable description of the backend
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
enum Backend {
    Database(DatabaseStorage),
    InMemory(InMemoryStorage),
}

/// Repository for documents.
/// The backend is fixed at construction; storage errors are returned, never
/// retried against a different backend.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    backend: Backend,
}

impl Default for DocumentRepository {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl DocumentRepository {
    /// Repository backed by a SQLite pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            backend: Backend::Database(DatabaseStorage::new(pool)),
        }
    }

    /// Repository kept in process memory
    pub fn in_memory() -> Self {
        Self::with_storage(InMemoryStorage::new())
    }

    /// Repository over an existing in-memory storage (shared with its clones)
    pub fn with_storage(storage: InMemoryStorage) -> Self {
        Self {
            backend: Backend::InMemory(storage),
        }
    }
}

#[async_trait]
impl DocumentRepositoryTrait for DocumentRepository {
    async fn get(&self, key: &DocumentKey) -> Result<Document, RepositoryError> {
        let document = match &self.backend {
            Backend::Database(storage) => storage.get_document(key).await?,
            Backend::InMemory(storage) => storage.get_document(key).await?,
        };

        if document.is_none() {
            debug!("Document {} not found, using empty document", key);
        }

        Ok(document.unwrap_or_default())
    }

    async fn set(
        &self,
        key: &DocumentKey,
        fields: WriteFields,
        options: SetOptions,
    ) -> Result<Document, RepositoryError> {
        match &self.backend {
            Backend::Database(storage) => storage.write_document(key, &fields, options).await,
            Backend::InMemory(storage) => storage.write_document(key, &fields, options).await,
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        match &self.backend {
            Backend::Database(storage) => storage.ping().await,
            Backend::InMemory(storage) => storage.len().map(|_| ()),
        }
    }

    fn describe(&self) -> String {
        match &self.backend {
            Backend::Database(storage) => get_connection_info(storage.pool()),
            Backend::InMemory(_) => "In-memory document store".to_string(),
        }
    }
}
