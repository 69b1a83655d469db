// Public entities for the Daily Pulse API
// This module contains data structures that are shared across the application boundary

// Pulse, meal log and dashboard payloads
pub mod daily_health;

// Query parameters and serialization helpers
pub mod common;
