use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*(?:```|$)").expect("fenced block pattern is valid")
});

/// Decodes the completion content into a JSON value. JSON mode should make
/// the content a bare object, but a fenced block is unwrapped if one shows up.
pub fn parse_completion_content(content: &str) -> Result<Value, serde_json::Error> {
    let json_content = extract_json_from_response(content);
    serde_json::from_str(json_content)
}

fn extract_json_from_response(response: &str) -> &str {
    let trimmed = response.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    FENCED_JSON
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_object() {
        let value = parse_completion_content(r#"  {"workout_plan": {"weekly_schedule": []}} "#).unwrap();
        assert_eq!(value, json!({"workout_plan": {"weekly_schedule": []}}));
    }

    #[test]
    fn test_parse_fenced_block() {
        let content = "Here is your plan:\n```json\n{\"weekly_adaptation_strategy\": \"rest more\"}\n```\nGood luck!";
        let value = parse_completion_content(content).unwrap();
        assert_eq!(value["weekly_adaptation_strategy"], "rest more");
    }

    #[test]
    fn test_parse_unterminated_fence() {
        let content = "```json\n{\"a\": 1}";
        assert_eq!(parse_completion_content(content).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_completion_content("Sorry, I can't help with that.").is_err());
        assert!(parse_completion_content("{\"truncated\": [1, 2").is_err());
    }

    #[test]
    fn test_parse_non_object_json_is_still_json() {
        assert_eq!(parse_completion_content("\"just text\"").unwrap(), json!("just text"));
    }
}
