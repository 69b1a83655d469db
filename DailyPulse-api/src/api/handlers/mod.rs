pub mod daily_health;
pub mod health;

// Re-export handlers for easier imports
pub use daily_health::{daily_pulse, health_dashboard, log_meal, method_not_allowed};
pub use health::health_check;
