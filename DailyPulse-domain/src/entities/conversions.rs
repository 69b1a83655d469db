use serde_json::Value;

use daily_pulse_data::models::{Document, WriteFields};
use crate::entities::records::{
    HealthDashboard, MealLogEntry, MealLogRequest, NutritionRecord, PulseRecord,
    UserProfile, WearableRecord, DEFAULT_STEP_GOAL,
};

// Conversion functions between stored documents and domain entities.
// Missing or mistyped fields fall back to their defaults; conversion never fails.

/// Numeric field, 0 when absent or not a number
fn number_field(document: &Document, name: &str) -> f64 {
    document
        .get(name)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Non-empty string field
fn string_field(document: &Document, name: &str) -> Option<String> {
    document
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// String array field; non-string entries are skipped
fn string_list_field(document: &Document, name: &str) -> Vec<String> {
    document
        .get(name)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Convert a stored wearable document to a domain record
pub fn convert_to_wearable_record(document: &Document) -> WearableRecord {
    WearableRecord {
        sleep_hours: number_field(document, "sleepHours"),
        steps: number_field(document, "steps"),
        hrv: number_field(document, "hrv"),
    }
}

/// Convert a stored nutrition document to a domain record
pub fn convert_to_nutrition_record(document: &Document) -> NutritionRecord {
    NutritionRecord {
        photo_url: string_field(document, "photoUrl"),
        foods: string_list_field(document, "foods"),
        calories: number_field(document, "calories"),
        water: number_field(document, "water"),
        updated_at: string_field(document, "updatedAt"),
    }
}

/// Convert a stored profile document to a domain profile.
/// A step goal of 0 counts as unset.
pub fn convert_to_user_profile(document: &Document) -> UserProfile {
    let step_goal = number_field(document, "stepGoal");

    UserProfile {
        step_goal: if step_goal == 0.0 { DEFAULT_STEP_GOAL } else { step_goal },
    }
}

/// Flatten same-day wearable and nutrition records
pub fn convert_to_dashboard(wearable: &WearableRecord, nutrition: NutritionRecord) -> HealthDashboard {
    HealthDashboard {
        sleep_hours: wearable.sleep_hours,
        hrv: wearable.hrv,
        steps: wearable.steps,
        calories: nutrition.calories,
        water: nutrition.water,
        foods: nutrition.foods,
    }
}

/// Fields for a full overwrite of the pulse document
pub fn convert_to_pulse_fields(pulse: &PulseRecord) -> WriteFields {
    let focus_areas: Vec<Value> = pulse
        .focus_areas
        .iter()
        .map(|area| Value::from(area.as_str()))
        .collect();

    WriteFields::new()
        .set("pulseMessage", pulse.pulse_message.as_str())
        .set("focusAreas", focus_areas)
}

/// Fields for merging a meal into the nutrition document.
/// Totals are sent as increments so concurrent logs cannot lose each other.
pub fn convert_to_meal_log_fields(photo_url: &str, request: &MealLogRequest) -> WriteFields {
    let foods: Vec<Value> = request.foods.iter().map(|food| Value::from(food.as_str())).collect();

    WriteFields::new()
        .set("photoUrl", photo_url)
        .set("foods", foods)
        .increment("calories", request.calories)
        .increment("water", request.water)
        .server_timestamp("updatedAt")
}

/// Convert the resolved meal log write back to a domain entry
pub fn convert_to_meal_log_entry(resolved: &Document) -> MealLogEntry {
    let record = convert_to_nutrition_record(resolved);

    MealLogEntry {
        photo_url: record.photo_url.unwrap_or_default(),
        foods: record.foods,
        calories: record.calories,
        water: record.water,
        updated_at: record.updated_at.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::records::FocusArea;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_empty_documents_use_defaults() {
        let empty = Document::new();

        assert_eq!(convert_to_wearable_record(&empty), WearableRecord::default());
        assert_eq!(convert_to_nutrition_record(&empty), NutritionRecord::default());
        assert_eq!(convert_to_user_profile(&empty).step_goal, 8000.0);
    }

    #[test]
    fn test_mistyped_fields_use_defaults() {
        let wearable = doc(json!({ "sleepHours": "seven", "steps": null, "hrv": 42 }));
        let record = convert_to_wearable_record(&wearable);

        assert_eq!(record.sleep_hours, 0.0);
        assert_eq!(record.steps, 0.0);
        assert_eq!(record.hrv, 42.0);

        let nutrition = doc(json!({ "foods": ["rice", 3, "beans"], "calories": "many" }));
        let record = convert_to_nutrition_record(&nutrition);
        assert_eq!(record.foods, vec!["rice".to_string(), "beans".to_string()]);
        assert_eq!(record.calories, 0.0);
    }

    #[test]
    fn test_zero_step_goal_counts_as_unset() {
        assert_eq!(convert_to_user_profile(&doc(json!({ "stepGoal": 0 }))).step_goal, 8000.0);
        assert_eq!(convert_to_user_profile(&doc(json!({ "stepGoal": 12000 }))).step_goal, 12000.0);
    }

    #[test]
    fn test_pulse_fields() {
        let pulse = PulseRecord {
            pulse_message: "msg".to_string(),
            focus_areas: vec![FocusArea::Rest, FocusArea::Movement],
        };
        let fields = convert_to_pulse_fields(&pulse);
        let names: Vec<&str> = fields.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["pulseMessage", "focusAreas"]);
    }

    #[test]
    fn test_meal_log_entry_from_resolved_write() {
        let resolved = doc(json!({
            "photoUrl": "meal.jpg",
            "foods": ["toast"],
            "calories": 350,
            "water": 2,
            "updatedAt": "2024-03-15T08:30:00.000Z"
        }));
        let entry = convert_to_meal_log_entry(&resolved);

        assert_eq!(entry.photo_url, "meal.jpg");
        assert_eq!(entry.foods, vec!["toast".to_string()]);
        assert_eq!(entry.calories, 350.0);
        assert_eq!(entry.updated_at, "2024-03-15T08:30:00.000Z");
    }
}
