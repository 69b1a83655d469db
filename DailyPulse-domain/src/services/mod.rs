// Domain services
// This module contains business logic implementations.

pub mod clock;
pub mod daily_health;
pub mod pulse;

// Re-export service traits and factory functions
pub use clock::{Clock, FixedClock, SystemClock};
pub use daily_health::{
    create_default_daily_health_service, DailyHealthService, DailyHealthServiceError,
    DailyHealthServiceTrait,
};
pub use pulse::{evaluate_pulse, FUN_FACT};
