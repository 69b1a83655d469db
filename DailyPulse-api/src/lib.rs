// DailyPulse-api lib.rs
//
// Library side of the Daily Pulse API: router, handlers, public entities,
// OpenAPI documentation and server configuration.

pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;

pub use api::{create_app, AppState};
