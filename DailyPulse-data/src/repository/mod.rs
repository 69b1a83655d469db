// Repository module structure
pub mod errors;
mod document;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use document::{DocumentRepository, DocumentRepositoryTrait};
pub use in_memory::InMemoryStorage;
pub use storage::DatabaseStorage;
