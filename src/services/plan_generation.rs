use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::groq::GroqClient;
use crate::models::plan::WorkoutPlan;
use crate::models::profile::UserProfile;
use crate::services::plan_validator::{self, ShapeViolation};
use crate::services::{ai_parser, ai_prompt, plan_normalizer};
use crate::store::ProfileStore;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Failed to generate workout plan")]
    Upstream(#[source] anyhow::Error),
    #[error("Failed to parse workout plan")]
    MalformedReply {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Received invalid workout plan data")]
    InvalidShape {
        raw: Value,
        #[source]
        violation: ShapeViolation,
    },
    #[error("Failed to save workout plan")]
    Storage(#[source] anyhow::Error),
}

impl PlanError {
    /// The unprocessed model reply, when the failure happened after one arrived.
    pub fn raw_response(&self) -> Option<Value> {
        match self {
            PlanError::MalformedReply { raw, .. } => Some(Value::String(raw.clone())),
            PlanError::InvalidShape { raw, .. } => Some(raw.clone()),
            PlanError::Upstream(_) | PlanError::Storage(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct PlanGenerationService {
    groq_client: GroqClient,
}

impl PlanGenerationService {
    pub fn new(groq_client: GroqClient) -> Self {
        Self { groq_client }
    }

    /// Request, parse, normalize and validate one plan. Nothing is persisted.
    pub async fn generate_plan(&self, profile: &UserProfile) -> Result<WorkoutPlan, PlanError> {
        let prompt = ai_prompt::build_workout_plan_prompt(profile);

        debug!(prompt = %prompt, "groq.prompt");

        let content = self
            .groq_client
            .complete_json(ai_prompt::SYSTEM_PROMPT, &prompt)
            .await
            .map_err(PlanError::Upstream)?;

        debug!(response = %content, "groq.response");

        let raw = ai_parser::parse_completion_content(&content).map_err(|source| {
            PlanError::MalformedReply {
                raw: content.clone(),
                source,
            }
        })?;

        let plan = plan_validator::accept(plan_normalizer::normalize(&raw))
            .map_err(|violation| PlanError::InvalidShape { raw, violation })?;

        info!(
            plan_name = %plan.workout_plan.name,
            training_days = plan.workout_plan.weekly_schedule.len(),
            injury_protocols = plan.recovery_protocols.injury_specific_protocols.len(),
            "plan.generated"
        );

        Ok(plan)
    }

    /// Generates a plan and replaces the stored one. The stored plan is only
    /// touched once a new plan has been accepted.
    pub async fn generate_and_store(
        &self,
        profile: &UserProfile,
        store: &ProfileStore,
    ) -> Result<WorkoutPlan, PlanError> {
        let plan = match self.generate_plan(profile).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "plan.generation_failed_keeping_previous");
                return Err(e);
            }
        };

        store.save_plan(&plan).await.map_err(PlanError::Storage)?;
        info!("plan.saved");

        Ok(plan)
    }
}
