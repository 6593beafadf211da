use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::models::profile::{UserProfile, UserProfileUpdate};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub onboarding_complete: bool,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            onboarding_complete: profile.has_completed_onboarding(),
            profile,
        }
    }
}

pub async fn get_profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.store.load_profile().await?;
    Ok(Json(profile.into()))
}

pub async fn replace_profile(
    State(state): State<AppState>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(profile) = payload?;
    profile.validate()?;

    state.store.save_profile(&profile).await?;
    tracing::info!(
        onboarding_complete = profile.has_completed_onboarding(),
        "profile.saved"
    );

    Ok(Json(profile.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    payload: Result<Json<UserProfileUpdate>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let Json(update) = payload?;

    let mut profile = state.store.load_profile().await?;
    profile.apply(update);
    profile.validate()?;

    state.store.save_profile(&profile).await?;
    tracing::info!(
        onboarding_complete = profile.has_completed_onboarding(),
        "profile.updated"
    );

    Ok(Json(profile.into()))
}

pub async fn delete_profile(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.store.clear_profile().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clears both the profile and the plan.
pub async fn reset_data(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.store.clear_all().await?;
    tracing::info!("store.reset");
    Ok(StatusCode::NO_CONTENT)
}
