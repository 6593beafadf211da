use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::models::plan::WorkoutPlan;
use crate::models::profile::UserProfile;

/// Set while a persisted generation is outstanding. Dropping the guard clears it.
pub struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    pub fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(Arc::clone(flag)))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Stateless generation: profile in, normalized plan out.
pub async fn generate_plan(
    State(state): State<AppState>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<WorkoutPlan>, ApiError> {
    let Json(profile) = payload?;
    profile.validate()?;

    tracing::info!(
        injuries = profile.injuries.len(),
        days_per_week = profile.days_per_week,
        "plan.requested"
    );

    let plan = state
        .plan_generation_service
        .generate_plan(&profile)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, cause = ?e, "failed to generate workout plan");
            ApiError::plan(e, state.config.expose_raw_responses)
        })?;

    Ok(Json(plan))
}

/// Generates from the stored profile and replaces the stored plan on success.
pub async fn create_plan(State(state): State<AppState>) -> Result<Json<WorkoutPlan>, ApiError> {
    let Some(_guard) = InFlightGuard::acquire(&state.generation_in_flight) else {
        tracing::warn!("plan.generation_already_in_flight");
        return Err(ApiError::Conflict(
            "A workout plan is already being generated",
        ));
    };

    let profile = state.store.load_profile().await?;
    if !profile.has_completed_onboarding() {
        return Err(ApiError::BadRequest(
            "Complete your profile before generating a workout plan".to_string(),
        ));
    }
    profile.validate()?;

    tracing::info!(
        injuries = profile.injuries.len(),
        days_per_week = profile.days_per_week,
        "plan.regeneration_requested"
    );

    let plan = state
        .plan_generation_service
        .generate_and_store(&profile, &state.store)
        .await
        .map_err(|e| ApiError::plan(e, state.config.expose_raw_responses))?;

    Ok(Json(plan))
}

pub async fn get_plan(State(state): State<AppState>) -> Result<Json<WorkoutPlan>, ApiError> {
    state
        .store
        .load_plan()
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("No workout plan has been generated yet"))
}

pub async fn delete_plan(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.store.clear_plan().await?;
    Ok(StatusCode::NO_CONTENT)
}
