//! Threshold rules behind the daily pulse message

use crate::entities::{DailySnapshot, FocusArea, PulseRecord};

/// Appended to every pulse message, triggered rules or not
pub const FUN_FACT: &str = " Fun fact: Did you know power naps can improve reaction time by 30%?";

/// Sleep below this many hours asks for rest
pub const MIN_SLEEP_HOURS: f64 = 6.0;

/// Fewer glasses of water than this asks for hydration
pub const MIN_WATER_GLASSES: f64 = 2.0;

/// Share of the step goal that must be reached to skip the movement nudge
pub const STEP_GOAL_RATIO: f64 = 0.5;

const HYDRATION_FRAGMENT: &str = "Drink 2 extra glasses of water.";
const MOVEMENT_FRAGMENT: &str = "Consider a short walk today.";

/// Evaluate the rules in fixed order: rest, hydration, movement
pub fn evaluate_pulse(snapshot: &DailySnapshot) -> PulseRecord {
    let mut focus_areas = Vec::new();
    let mut fragments = Vec::new();

    if snapshot.wearable.sleep_hours < MIN_SLEEP_HOURS {
        focus_areas.push(FocusArea::Rest);
        fragments.push(format!(
            "You slept {} hours, below usual.",
            format_number(snapshot.wearable.sleep_hours)
        ));
    }

    if snapshot.nutrition.water < MIN_WATER_GLASSES {
        focus_areas.push(FocusArea::Hydration);
        fragments.push(HYDRATION_FRAGMENT.to_string());
    }

    if snapshot.wearable.steps < STEP_GOAL_RATIO * snapshot.profile.step_goal {
        focus_areas.push(FocusArea::Movement);
        fragments.push(MOVEMENT_FRAGMENT.to_string());
    }

    PulseRecord {
        pulse_message: format!("{}{}", fragments.join(" "), FUN_FACT),
        focus_areas,
    }
}

/// Render a number the way JavaScript prints it: `5` rather than `5.0`,
/// and `1e+21` or `1e-7` outside the plain decimal range
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also covers -0
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }

    let exponential = format!("{:e}", value);
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
        _ => exponential,
    }
}
