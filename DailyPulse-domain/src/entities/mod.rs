pub mod records;
pub mod conversions;

// Re-export common types for easier imports
pub use records::{
    DailySnapshot, FocusArea, HealthDashboard, MealLogEntry, MealLogRequest, NutritionRecord,
    PulseRecord, UserProfile, WearableRecord,
};
pub use records::{
    DEFAULT_STEP_GOAL, NUTRITION_COLLECTION, PROFILE_COLLECTION, PULSE_COLLECTION,
    WEARABLE_COLLECTION,
};
