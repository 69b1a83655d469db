use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Collection holding per-day wearable summaries
pub const WEARABLE_COLLECTION: &str = "wearableData";

/// Collection holding per-day nutrition logs
pub const NUTRITION_COLLECTION: &str = "foodLogs";

/// Collection holding user profiles (one document per user)
pub const PROFILE_COLLECTION: &str = "users";

/// Collection holding the generated daily pulse
pub const PULSE_COLLECTION: &str = "dailyPulse";

/// Step goal used when the profile does not set one
pub const DEFAULT_STEP_GOAL: f64 = 8000.0;

/// Wearable summary for one day, written by the ingestion path
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WearableRecord {
    /// Hours slept
    pub sleep_hours: f64,

    /// Steps walked
    pub steps: f64,

    /// Heart rate variability
    pub hrv: f64,
}

/// Nutrition log for one day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Photo of the most recently logged meal
    pub photo_url: Option<String>,

    /// Foods from the most recently logged meal
    pub foods: Vec<String>,

    /// Running calorie total for the day
    pub calories: f64,

    /// Running water total (glasses) for the day
    pub water: f64,

    /// When the log was last written
    pub updated_at: Option<String>,
}

/// Per-user goals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Daily step goal
    pub step_goal: f64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            step_goal: DEFAULT_STEP_GOAL,
        }
    }
}

/// Everything the pulse rules look at for one user and day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailySnapshot {
    pub wearable: WearableRecord,
    pub nutrition: NutritionRecord,
    pub profile: UserProfile,
}

/// Health dimension that fell below its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusArea {
    Rest,
    Hydration,
    Movement,
}

impl FocusArea {
    /// Tag used in stored documents and API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusArea::Rest => "rest",
            FocusArea::Hydration => "hydration",
            FocusArea::Movement => "movement",
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The generated daily pulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseRecord {
    /// Message shown to the user
    pub pulse_message: String,

    /// Areas to focus on, in rule order
    pub focus_areas: Vec<FocusArea>,
}

/// Flattened same-day view of wearable and nutrition data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthDashboard {
    pub sleep_hours: f64,
    pub hrv: f64,
    pub steps: f64,
    pub calories: f64,
    pub water: f64,
    pub foods: Vec<String>,
}

/// A meal to add to today's nutrition log
///
/// `user_id` and `photo_url` are optional here so that a missing field is a
/// validation failure rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct MealLogRequest {
    #[validate(required(message = "userId and photoUrl required"), length(min = 1, message = "userId and photoUrl required"))]
    pub user_id: Option<String>,

    #[validate(required(message = "userId and photoUrl required"), length(min = 1, message = "userId and photoUrl required"))]
    pub photo_url: Option<String>,

    pub foods: Vec<String>,

    #[validate(range(min = 0.0, message = "calories and water must not be negative"))]
    pub calories: f64,

    #[validate(range(min = 0.0, message = "calories and water must not be negative"))]
    pub water: f64,
}

/// Nutrition log fields as written by a meal log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLogEntry {
    pub photo_url: String,
    pub foods: Vec<String>,

    /// Running calorie total after this meal
    pub calories: f64,

    /// Running water total after this meal
    pub water: f64,

    /// Server time of the write
    pub updated_at: String,
}
