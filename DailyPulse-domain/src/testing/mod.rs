// Testing utilities for the domain layer
// Only available in tests or when the "mock" feature is enabled

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use daily_pulse_data::models::{Document, DocumentKey, SetOptions, WriteFields};
use daily_pulse_data::repository::{DocumentRepository, DocumentRepositoryTrait, RepositoryError};

/// Repository wrapper that counts storage calls and can be told to fail.
/// Clones share the counters and the wrapped store.
#[derive(Debug, Clone, Default)]
pub struct RecordingRepository {
    inner: DocumentRepository,
    gets: Arc<AtomicUsize>,
    sets: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl RecordingRepository {
    /// Wrap a fresh in-memory repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing repository
    pub fn wrapping(inner: DocumentRepository) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    /// Configure every call to fail with a storage error
    pub fn with_failure(self) -> Self {
        self.set_failing(true);
        self
    }

    /// Toggle failure after construction
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Number of `get` calls so far
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of `set` calls so far
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Total storage calls so far
    pub fn call_count(&self) -> usize {
        self.get_count() + self.set_count()
    }

    fn check_failure(&self) -> Result<(), RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(RepositoryError::Lock("storage unavailable (simulated)".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentRepositoryTrait for RecordingRepository {
    async fn get(&self, key: &DocumentKey) -> Result<Document, RepositoryError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.get(key).await
    }

    async fn set(
        &self,
        key: &DocumentKey,
        fields: WriteFields,
        options: SetOptions,
    ) -> Result<Document, RepositoryError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.set(key, fields, options).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_failure()?;
        self.inner.ping().await
    }

    fn describe(&self) -> String {
        format!("Recording wrapper over {}", self.inner.describe())
    }
}
