// Daily Pulse Domain
// This crate contains the business logic for the Daily Pulse service

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the storage modules from daily_pulse_data for convenience
pub use daily_pulse_data::{database, repository};

// Testing utilities - only available in tests or with the mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
