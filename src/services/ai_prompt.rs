use crate::models::profile::UserProfile;

pub const SYSTEM_PROMPT: &str = "You are an expert fitness trainer and physical therapist specializing in adaptive workout plans.";

const PLAN_SCHEMA_EXAMPLE: &str = r#"{
  "user_profile": {
    "age": 0,
    "injuries": [],
    "fitness_goals": [],
    "fitness_level": "",
    "available_equipment": []
  },
  "workout_plan": {
    "name": "Personalized Adaptive Workout Plan",
    "duration_weeks": 4,
    "weekly_schedule": [
      {
        "day": "Monday",
        "focus": "",
        "exercises": [
          {
            "name": "",
            "sets": 0,
            "reps": "",
            "rest_seconds": 0,
            "injury_adaptations": "",
            "alternative_exercises": [],
            "notes": ""
          }
        ],
        "warm_up": [],
        "cool_down": []
      }
    ],
    "progression_strategy": {
      "week_1": "",
      "week_2": "",
      "week_3": "",
      "week_4": ""
    }
  },
  "recovery_protocols": {
    "daily_recommendations": [],
    "injury_specific_protocols": [
      {
        "injury": "",
        "rehabilitation_exercises": [],
        "avoid": [],
        "recovery_timeline": ""
      }
    ]
  },
  "nutrition_guidance": {
    "general_recommendations": [],
    "injury_recovery_support": []
  },
  "weekly_adaptation_strategy": "Description of how to adapt the plan if pain increases or decreases"
}"#;

pub fn format_profile_for_prompt(profile: &UserProfile) -> String {
    let mut output = format!("- Age: {}\n", profile.age);
    output.push_str(&format!(
        "- Current injuries: {}\n",
        format_list(&profile.injuries)
    ));
    output.push_str(&format!(
        "- Fitness goals: {}\n",
        format_list(&profile.fitness_goals)
    ));
    output.push_str(&format!("- Fitness level: {}\n", profile.fitness_level));
    output.push_str(&format!(
        "- Available equipment: {}\n",
        format_list(&profile.available_equipment)
    ));
    output.push_str(&format!(
        "- Days per week available to workout: {}",
        profile.days_per_week
    ));
    output
}

fn format_list(items: &[String]) -> String {
    items.join(", ")
}

pub fn build_workout_plan_prompt(profile: &UserProfile) -> String {
    format!(
        r#"You are an expert fitness trainer and physical therapist with extensive experience creating adaptive workout plans. I need you to create a personalized workout plan based on the following user information:

{}

## Important Guidelines:

1. The workout plan must carefully work around the user's injuries while still helping them progress toward their fitness goals
2. Include appropriate warm-up and mobility exercises specifically targeting the injured areas
3. Suggest recovery protocols and injury rehabilitation exercises
4. Adjust workout intensity, volume, and exercise selection based on fitness level and age
5. Structure the plan to progressively increase difficulty over 4 weeks
6. Schedule exactly {} training days in weekly_schedule

## Response Format:

Respond ONLY with a JSON object following this exact structure:

```json
{}
```

Important: Return ONLY the valid JSON object with no additional explanation or text. The JSON must be properly formatted and valid."#,
        format_profile_for_prompt(profile),
        profile.days_per_week,
        PLAN_SCHEMA_EXAMPLE
    )
}
