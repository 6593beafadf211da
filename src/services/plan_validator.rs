use serde_json::Value;

use crate::models::plan::WorkoutPlan;
use crate::services::plan_normalizer::NormalizedPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShapeViolation {
    #[error("plan is not an object")]
    NotAnObject,
    #[error("missing workout_plan")]
    MissingWorkoutPlan,
    #[error("missing workout_plan.weekly_schedule")]
    MissingWeeklySchedule,
    #[error("workout_plan.weekly_schedule is not a list")]
    WeeklyScheduleNotAList,
    #[error("missing recovery_protocols")]
    MissingRecoveryProtocols,
    #[error("missing nutrition_guidance")]
    MissingNutritionGuidance,
}

/// Accept/reject gate for a plan-shaped value. Only the required containers
/// are checked, not their contents.
pub fn validate_plan_shape(value: &Value) -> Result<(), ShapeViolation> {
    let plan = value.as_object().ok_or(ShapeViolation::NotAnObject)?;

    let workout_plan = present(plan.get("workout_plan")).ok_or(ShapeViolation::MissingWorkoutPlan)?;
    let schedule = present(workout_plan.get("weekly_schedule"))
        .ok_or(ShapeViolation::MissingWeeklySchedule)?;
    if !schedule.is_array() {
        return Err(ShapeViolation::WeeklyScheduleNotAList);
    }

    present(plan.get("recovery_protocols")).ok_or(ShapeViolation::MissingRecoveryProtocols)?;
    present(plan.get("nutrition_guidance")).ok_or(ShapeViolation::MissingNutritionGuidance)?;

    Ok(())
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Final gate after normalization. A typed plan already carries every
/// container; an unrecognized value is checked and rejected.
pub fn accept(normalized: NormalizedPlan) -> Result<WorkoutPlan, ShapeViolation> {
    match normalized {
        NormalizedPlan::Plan(plan) => Ok(plan),
        NormalizedPlan::Unrecognized(value) => {
            validate_plan_shape(&value)?;
            Err(ShapeViolation::NotAnObject)
        }
    }
}
