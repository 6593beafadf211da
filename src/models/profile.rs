use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_DAYS_PER_WEEK: u8 = 1;
pub const MAX_DAYS_PER_WEEK: u8 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FitnessLevel::Beginner => "Beginner",
            FitnessLevel::Intermediate => "Intermediate",
            FitnessLevel::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub injuries: Vec<String>,
    pub fitness_goals: Vec<String>,
    pub fitness_level: FitnessLevel,
    pub available_equipment: Vec<String>,
    pub days_per_week: u8,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 30,
            injuries: Vec::new(),
            fitness_goals: Vec::new(),
            fitness_level: FitnessLevel::Beginner,
            available_equipment: Vec::new(),
            days_per_week: 3,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("daysPerWeek must be between 1 and 7, got {0}")]
    DaysPerWeekOutOfRange(u8),
}

impl UserProfile {
    /// A profile is usable for plan generation once it has a name and at least one injury.
    pub fn has_completed_onboarding(&self) -> bool {
        !self.name.trim().is_empty() && !self.injuries.is_empty()
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(MIN_DAYS_PER_WEEK..=MAX_DAYS_PER_WEEK).contains(&self.days_per_week) {
            return Err(ProfileError::DaysPerWeekOutOfRange(self.days_per_week));
        }
        Ok(())
    }

    pub fn apply(&mut self, update: UserProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(injuries) = update.injuries {
            self.injuries = injuries;
        }
        if let Some(goals) = update.fitness_goals {
            self.fitness_goals = goals;
        }
        if let Some(level) = update.fitness_level {
            self.fitness_level = level;
        }
        if let Some(equipment) = update.available_equipment {
            self.available_equipment = equipment;
        }
        if let Some(days) = update.days_per_week {
            self.days_per_week = days;
        }
    }
}

/// Partial profile edit; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub injuries: Option<Vec<String>>,
    pub fitness_goals: Option<Vec<String>>,
    pub fitness_level: Option<FitnessLevel>,
    pub available_equipment: Option<Vec<String>>,
    pub days_per_week: Option<u8>,
}
