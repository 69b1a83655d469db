// Database migrations module
// Schema changes are applied in order and are idempotent

mod sqlite;
pub use sqlite::run_migrations as run_sqlite_migrations;
