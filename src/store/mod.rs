pub mod local;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

use crate::models::plan::WorkoutPlan;
use crate::models::profile::UserProfile;
use crate::services::{plan_normalizer, plan_validator};
use crate::store::local::LocalStore;

pub const PROFILE_KEY: &str = "adaptfit_user_data";
pub const PLAN_KEY: &str = "adaptfit_workout_plan";

/// The single owner of the persisted profile and plan records.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    records: LocalStore,
}

impl ProfileStore {
    pub fn new(records: LocalStore) -> Self {
        Self { records }
    }

    /// Stored profile, or the default profile when none is stored. A corrupt
    /// record is logged and removed.
    pub async fn load_profile(&self) -> Result<UserProfile> {
        let Some(raw) = self.records.get(PROFILE_KEY).await? else {
            return Ok(UserProfile::default());
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                warn!(key = PROFILE_KEY, error = %e, "store.corrupt_record");
                self.records.remove(PROFILE_KEY).await?;
                Ok(UserProfile::default())
            }
        }
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let contents = serde_json::to_string(profile)?;
        self.records.set(PROFILE_KEY, &contents).await
    }

    pub async fn clear_profile(&self) -> Result<()> {
        self.records.remove(PROFILE_KEY).await?;
        info!(key = PROFILE_KEY, "store.record_cleared");
        Ok(())
    }

    /// Last accepted plan. The stored value goes back through normalization
    /// and the shape gate; anything unreadable is logged and removed.
    pub async fn load_plan(&self) -> Result<Option<WorkoutPlan>> {
        let Some(raw) = self.records.get(PLAN_KEY).await? else {
            return Ok(None);
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = PLAN_KEY, error = %e, "store.corrupt_record");
                self.records.remove(PLAN_KEY).await?;
                return Ok(None);
            }
        };

        match plan_validator::accept(plan_normalizer::normalize(&value)) {
            Ok(plan) => Ok(Some(plan)),
            Err(violation) => {
                warn!(key = PLAN_KEY, %violation, "store.invalid_plan_record");
                self.records.remove(PLAN_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn save_plan(&self, plan: &WorkoutPlan) -> Result<()> {
        let contents = serde_json::to_string(plan)?;
        self.records.set(PLAN_KEY, &contents).await
    }

    pub async fn clear_plan(&self) -> Result<()> {
        self.records.remove(PLAN_KEY).await?;
        info!(key = PLAN_KEY, "store.record_cleared");
        Ok(())
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.clear_profile().await?;
        self.clear_plan().await
    }
}
