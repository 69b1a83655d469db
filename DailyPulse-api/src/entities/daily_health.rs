use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use daily_pulse_domain::entities::{HealthDashboard, MealLogEntry, MealLogRequest, PulseRecord};
use super::common::serialize_number;

/// Today's pulse for a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PulseResponse {
    /// Triggered advice followed by the fun fact
    #[schema(example = "You slept 5 hours, below usual. Fun fact: Did you know power naps can improve reaction time by 30%?")]
    pub pulse_message: String,

    /// Triggered focus areas in the order rest, hydration, movement
    #[schema(example = json!(["rest"]))]
    pub focus_areas: Vec<String>,
}

impl From<PulseRecord> for PulseResponse {
    fn from(pulse: PulseRecord) -> Self {
        Self {
            pulse_message: pulse.pulse_message,
            focus_areas: pulse
                .focus_areas
                .iter()
                .map(|area| area.as_str().to_string())
                .collect(),
        }
    }
}

/// Meal to add to today's nutrition log
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct MealLogBody {
    /// Owner of the log (required)
    pub user_id: Option<String>,

    /// Photo of the meal (required)
    pub photo_url: Option<String>,

    /// Foods in the meal
    pub foods: Vec<String>,

    /// Calories to add to the running total
    pub calories: f64,

    /// Glasses of water to add to the running total
    pub water: f64,
}

/// Document id from a JSON field; numeric ids are taken as their decimal text
fn id_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

impl MealLogBody {
    /// Parse a request body. Fields of the wrong type are dropped and take
    /// their default; anything other than a JSON object is an empty body.
    pub fn from_slice(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Self {
                user_id: id_field(map.get("userId")),
                photo_url: map.get("photoUrl").and_then(Value::as_str).map(str::to_string),
                foods: map
                    .get("foods")
                    .and_then(Value::as_array)
                    .map(|foods| foods.iter().filter_map(Value::as_str).map(str::to_string).collect())
                    .unwrap_or_default(),
                calories: map.get("calories").and_then(Value::as_f64).unwrap_or(0.0),
                water: map.get("water").and_then(Value::as_f64).unwrap_or(0.0),
            },
            _ => Self::default(),
        }
    }
}

impl From<MealLogBody> for MealLogRequest {
    fn from(body: MealLogBody) -> Self {
        Self {
            user_id: body.user_id,
            photo_url: body.photo_url,
            foods: body.foods,
            calories: body.calories,
            water: body.water,
        }
    }
}

/// Nutrition log as written by the meal log
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealLog {
    pub photo_url: String,
    pub foods: Vec<String>,

    /// Running calorie total for the day
    #[serde(serialize_with = "serialize_number")]
    pub calories: f64,

    /// Running water total for the day
    #[serde(serialize_with = "serialize_number")]
    pub water: f64,

    /// Server time of the write (RFC 3339)
    pub updated_at: String,
}

impl From<MealLogEntry> for MealLog {
    fn from(entry: MealLogEntry) -> Self {
        Self {
            photo_url: entry.photo_url,
            foods: entry.foods,
            calories: entry.calories,
            water: entry.water,
            updated_at: entry.updated_at,
        }
    }
}

/// Meal log result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MealLogResponse {
    pub success: bool,
    pub log: MealLog,
}

/// Same-day wearable and nutrition summary
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    #[serde(serialize_with = "serialize_number")]
    pub sleep_hours: f64,
    #[serde(serialize_with = "serialize_number")]
    pub hrv: f64,
    #[serde(serialize_with = "serialize_number")]
    pub steps: f64,
    #[serde(serialize_with = "serialize_number")]
    pub calories: f64,
    #[serde(serialize_with = "serialize_number")]
    pub water: f64,
    pub foods: Vec<String>,
}

impl From<HealthDashboard> for DashboardResponse {
    fn from(dashboard: HealthDashboard) -> Self {
        Self {
            sleep_hours: dashboard.sleep_hours,
            hrv: dashboard.hrv,
            steps: dashboard.steps,
            calories: dashboard.calories,
            water: dashboard.water,
            foods: dashboard.foods,
        }
    }
}
