use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::plan::{
    InjuryProtocol, PlanUserProfile, ProgressionStrategy, WorkoutDay, WorkoutPlan, lenient,
};
use crate::services::plan_validator::validate_plan_shape;

/// Outcome of normalizing an arbitrary value into the canonical plan.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedPlan {
    Plan(WorkoutPlan),
    /// Not object-shaped at all. Handed back untouched so nothing is lost.
    Unrecognized(Value),
}

/// Coerces a model reply, a stored plan or anything in between into the
/// canonical schema.
///
/// 1. A value that already has the required containers is decoded as a whole.
/// 2. A `{"content": ...}` wrapper with a truthy `content` is unwrapped and
///    normalized recursively.
/// 3. Any other object is rebuilt section by section over the defaults,
///    keeping only sections of the expected shape.
/// 4. Anything that is not an object comes back as `Unrecognized`.
pub fn normalize(value: &Value) -> NormalizedPlan {
    if validate_plan_shape(value).is_ok() {
        match serde_json::from_value::<WorkoutPlan>(value.clone()) {
            Ok(plan) => return NormalizedPlan::Plan(plan),
            Err(e) => debug!(error = %e, "plan_normalizer.strict_decode_failed"),
        }
    } else if let Some(content) = value.get("content").filter(|c| is_truthy(c)) {
        debug!("plan_normalizer.unwrap_content");
        return normalize(content);
    }

    match value {
        Value::Object(_) => NormalizedPlan::Plan(rebuild(value)),
        other => {
            warn!(kind = value_kind(other), "plan_normalizer.unrecognized_value");
            NormalizedPlan::Unrecognized(other.clone())
        }
    }
}

fn rebuild(data: &Value) -> WorkoutPlan {
    let mut plan = WorkoutPlan::default();

    if let Some(profile) = data.get("user_profile") {
        plan.user_profile = decode_or_default::<PlanUserProfile>(profile, "user_profile");
    }

    if let Some(program) = data.get("workout_plan") {
        if let Some(name) = program.get("name").and_then(Value::as_str)
            && !name.trim().is_empty()
        {
            plan.workout_plan.name = name.to_string();
        }

        if let Some(weeks) = program.get("duration_weeks").and_then(lenient::count_from)
            && weeks > 0
        {
            plan.workout_plan.duration_weeks = weeks;
        }

        if let Some(days) = program.get("weekly_schedule").and_then(Value::as_array) {
            plan.workout_plan.weekly_schedule = decode_entries::<WorkoutDay>(days, "weekly_schedule");
        }

        if let Some(progression) = program.get("progression_strategy") {
            plan.workout_plan.progression_strategy =
                decode_or_default::<ProgressionStrategy>(progression, "progression_strategy");
        }
    }

    if let Some(recovery) = data.get("recovery_protocols") {
        if let Some(items) = recovery.get("daily_recommendations").and_then(Value::as_array) {
            plan.recovery_protocols.daily_recommendations = lenient::texts(items);
        }
        if let Some(items) = recovery
            .get("injury_specific_protocols")
            .and_then(Value::as_array)
        {
            plan.recovery_protocols.injury_specific_protocols =
                decode_entries::<InjuryProtocol>(items, "injury_specific_protocols");
        }
    }

    if let Some(nutrition) = data.get("nutrition_guidance") {
        if let Some(items) = nutrition
            .get("general_recommendations")
            .and_then(Value::as_array)
        {
            plan.nutrition_guidance.general_recommendations = lenient::texts(items);
        }
        if let Some(items) = nutrition
            .get("injury_recovery_support")
            .and_then(Value::as_array)
        {
            plan.nutrition_guidance.injury_recovery_support = lenient::texts(items);
        }
    }

    if let Some(strategy) = data.get("weekly_adaptation_strategy").and_then(Value::as_str) {
        plan.weekly_adaptation_strategy = strategy.to_string();
    }

    plan
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn decode_or_default<T: DeserializeOwned + Default>(value: &Value, section: &str) -> T {
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!(section, error = %e, "plan_normalizer.section_dropped");
        T::default()
    })
}

/// Decodes each list entry on its own; entries of the wrong shape are dropped.
fn decode_entries<T: DeserializeOwned>(items: &[Value], section: &str) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(section, index, error = %e, "plan_normalizer.entry_dropped");
                None
            }
        })
        .collect()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
