//! Repair stage for free-form model output
//!
//! Language models are asked for strict JSON but routinely wrap it in
//! markdown fences or surround it with prose. `repair` strips those
//! artifacts and parses what is left; `unwrap_list` coerces the parsed
//! value into a list of entries.

use serde_json::Value as JsonValue;

use crate::error::ProviderError;

/// Keys under which models tend to nest the list we asked for, in priority order
pub const WRAPPER_KEYS: [&str; 3] = ["hospitals", "data", "items"];

/// Remove markdown code fences and surrounding whitespace.
pub fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse model output into JSON, tolerating fences and surrounding prose.
pub fn repair(raw: &str) -> Result<JsonValue, ProviderError> {
    let cleaned = strip_fences(raw);
    if cleaned.is_empty() {
        return Err(ProviderError::parse("model returned no text"));
    }

    match serde_json::from_str(&cleaned) {
        Ok(value) => Ok(value),
        Err(first_err) => embedded_json(&cleaned)
            .ok_or_else(|| ProviderError::parse(format!("not JSON: {first_err}"))),
    }
}

/// Parse the span from the first opening bracket to the last matching
/// closing one, trying whichever bracket type opens earlier first.
fn embedded_json(text: &str) -> Option<JsonValue> {
    let mut spans: Vec<(usize, usize)> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = text.find(open)?;
            let end = text.rfind(close)?;
            (end > start).then_some((start, end))
        })
        .collect();
    spans.sort_unstable();

    spans
        .into_iter()
        .find_map(|(start, end)| serde_json::from_str(&text[start..=end]).ok())
}

/// Coerce a parsed answer into a list of entries.
///
/// Arrays pass through. Objects are unwrapped through the first of
/// [`WRAPPER_KEYS`] that holds an array, or else become a one-element list.
/// Scalars yield nothing.
pub fn unwrap_list(value: JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(mut map) => {
            for key in WRAPPER_KEYS {
                if matches!(map.get(key), Some(JsonValue::Array(_))) {
                    if let Some(JsonValue::Array(items)) = map.remove(key) {
                        return items;
                    }
                }
            }
            vec![JsonValue::Object(map)]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        assert_eq!(repair(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
        assert_eq!(repair("  [1, 2]\n").unwrap(), json!([1, 2]));
    }

    #[test]
    fn test_fenced_equals_unfenced() {
        let body = r#"[{"name": "AIIMS"}]"#;
        let fenced = format!("```json\n{body}\n```");
        let bare_fence = format!("```\n{body}\n```");

        let expected = repair(body).unwrap();
        assert_eq!(repair(&fenced).unwrap(), expected);
        assert_eq!(repair(&bare_fence).unwrap(), expected);
    }

    #[test]
    fn test_prose_around_json() {
        let raw = "Sure! Here are the hospitals:\n[{\"name\": \"KEM\"}]\nHope this helps.";
        assert_eq!(repair(raw).unwrap(), json!([{"name": "KEM"}]));

        let raw = "Result: {\"health_alert\": \"ok\"} done";
        assert_eq!(repair(raw).unwrap(), json!({"health_alert": "ok"}));
    }

    #[test]
    fn test_citation_before_object() {
        let raw = r#"See [1]: {"prevalent_diseases": ["Dengue", "Malaria", "Flu"]}"#;
        assert_eq!(
            repair(raw).unwrap(),
            json!({"prevalent_diseases": ["Dengue", "Malaria", "Flu"]})
        );

        let raw = r#"Per {source}: [{"name": "KEM"}]"#;
        assert_eq!(repair(raw).unwrap(), json!([{"name": "KEM"}]));
    }

    #[test]
    fn test_malformed_is_parse_failure() {
        for raw in ["", "```json```", "not json at all", "{\"a\": ", "[1, 2"] {
            let err = repair(raw).unwrap_err();
            assert!(matches!(err, ProviderError::Parse(_)), "input {raw:?}");
        }
    }

    #[test]
    fn test_unwrap_hospitals_key() {
        let value = json!({"hospitals": [{"name": "A"}, {"name": "B"}]});
        assert_eq!(unwrap_list(value), vec![json!({"name": "A"}), json!({"name": "B"})]);
    }

    #[test]
    fn test_unwrap_key_priority() {
        let value = json!({"items": [3], "data": [2], "hospitals": [1]});
        assert_eq!(unwrap_list(value), vec![json!(1)]);

        let value = json!({"items": [3], "data": [2]});
        assert_eq!(unwrap_list(value), vec![json!(2)]);
    }

    #[test]
    fn test_unwrap_ignores_non_list_wrapper() {
        let value = json!({"hospitals": "none", "items": [{"name": "C"}]});
        assert_eq!(unwrap_list(value), vec![json!({"name": "C"})]);
    }

    #[test]
    fn test_bare_object_becomes_single_entry() {
        let value = json!({"name": "Fortis", "type": "Private"});
        assert_eq!(unwrap_list(value.clone()), vec![value]);
    }

    #[test]
    fn test_scalars_unwrap_to_nothing() {
        assert!(unwrap_list(json!("text")).is_empty());
        assert!(unwrap_list(json!(null)).is_empty());
    }
}
