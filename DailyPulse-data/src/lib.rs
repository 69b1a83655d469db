// Daily Pulse Data
// This crate owns document storage: keys, write semantics and the backends

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
