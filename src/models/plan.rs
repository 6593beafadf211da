use serde::{Deserialize, Serialize};

pub const DEFAULT_PLAN_NAME: &str = "Personalized Adaptive Workout Plan";
pub const DEFAULT_DURATION_WEEKS: u32 = 4;

/// Canonical workout plan. Every list defaults to empty and every section to
/// its zero-value shape, so a decoded plan can be rendered without null checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutPlan {
    #[serde(deserialize_with = "lenient::or_default")]
    pub user_profile: PlanUserProfile,
    #[serde(deserialize_with = "lenient::or_default")]
    pub workout_plan: TrainingProgram,
    #[serde(deserialize_with = "lenient::or_default")]
    pub recovery_protocols: RecoveryProtocols,
    #[serde(deserialize_with = "lenient::or_default")]
    pub nutrition_guidance: NutritionGuidance,
    #[serde(deserialize_with = "lenient::string")]
    pub weekly_adaptation_strategy: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanUserProfile {
    #[serde(deserialize_with = "lenient::count")]
    pub age: u32,
    #[serde(deserialize_with = "lenient::string_list")]
    pub injuries: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub fitness_goals: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub fitness_level: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub available_equipment: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingProgram {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::count")]
    pub duration_weeks: u32,
    #[serde(deserialize_with = "lenient::or_default")]
    pub weekly_schedule: Vec<WorkoutDay>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub progression_strategy: ProgressionStrategy,
}

impl Default for TrainingProgram {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAN_NAME.to_string(),
            duration_weeks: DEFAULT_DURATION_WEEKS,
            weekly_schedule: Vec::new(),
            progression_strategy: ProgressionStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutDay {
    #[serde(deserialize_with = "lenient::string")]
    pub day: String,
    #[serde(deserialize_with = "lenient::string")]
    pub focus: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub warm_up: Vec<String>,
    #[serde(deserialize_with = "lenient::entries")]
    pub exercises: Vec<PlannedExercise>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub cool_down: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannedExercise {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::count")]
    pub sets: u32,
    /// Free text: "8-10", "30 seconds", "AMRAP".
    #[serde(deserialize_with = "lenient::string")]
    pub reps: String,
    #[serde(deserialize_with = "lenient::count")]
    pub rest_seconds: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub injury_adaptations: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub alternative_exercises: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionStrategy {
    #[serde(deserialize_with = "lenient::string")]
    pub week_1: String,
    #[serde(deserialize_with = "lenient::string")]
    pub week_2: String,
    #[serde(deserialize_with = "lenient::string")]
    pub week_3: String,
    #[serde(deserialize_with = "lenient::string")]
    pub week_4: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryProtocols {
    #[serde(deserialize_with = "lenient::string_list")]
    pub daily_recommendations: Vec<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub injury_specific_protocols: Vec<InjuryProtocol>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjuryProtocol {
    #[serde(deserialize_with = "lenient::string")]
    pub injury: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub rehabilitation_exercises: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub avoid: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub recovery_timeline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionGuidance {
    #[serde(deserialize_with = "lenient::string_list")]
    pub general_recommendations: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub injury_recovery_support: Vec<String>,
}

/// Field decoders that absorb the usual drift in model output: nulls, numbers
/// sent as strings, a bare string where a list belongs. Scalar and list
/// decoders never fail.
pub mod lenient {
    use serde::de::{Deserialize, DeserializeOwned, Deserializer};
    use serde_json::Value;

    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
    }

    /// Text from any value. Lists are joined, objects are kept as JSON text.
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => String::new(),
            Value::String(text) => text,
            Value::Array(items) => texts(&items).join(", "),
            other => other.to_string(),
        })
    }

    /// Unreadable counts such as "as needed" become 0.
    pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(count_from(&value).unwrap_or_default())
    }

    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Vec::new(),
            Value::String(text) if text.trim().is_empty() => Vec::new(),
            Value::Array(items) => texts(&items),
            other => texts(std::slice::from_ref(&other)),
        })
    }

    /// Decodes list entries one by one and drops those of the wrong shape. A
    /// value that is not a list yields no entries.
    pub fn entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(found = %other, "plan.entries_not_a_list");
                Vec::new()
            }
        };

        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(index, error = %e, "plan.entry_dropped");
                    None
                }
            })
            .collect())
    }

    /// Non-negative integer from a number or a string such as "60" or "90 seconds".
    pub fn count_from(value: &Value) -> Option<u32> {
        match value {
            Value::Null => Some(0),
            Value::Number(number) => {
                if let Some(whole) = number.as_u64() {
                    u32::try_from(whole).ok()
                } else {
                    number
                        .as_f64()
                        .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u32::MAX))
                        .map(|f| f.round() as u32)
                }
            }
            Value::String(text) => {
                let digits: String = text
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            }
            _ => None,
        }
    }

    /// Renders list items as text, skipping nulls. Objects contribute their
    /// `name` when they have one.
    pub fn texts(items: &[Value]) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                Value::Object(fields) => Some(
                    fields
                        .get("name")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string()),
                ),
                Value::Array(_) => Some(item.to_string()),
            })
            .collect()
    }
}
