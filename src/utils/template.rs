//! Minimal `{{key}}` templating for client-rendered snippets

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace every `{{identifier}}` with `data[identifier]`.
///
/// Missing keys render as an empty string. Substituted values are not
/// scanned again, so a value containing `{{x}}` is inserted literally.
pub fn render(template: &str, data: &Map<String, Value>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            data.get(&caps[1]).map(value_text).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_simple_substitution() {
        assert_eq!(render("Hello {{name}}", &data(json!({"name": "A"}))), "Hello A");
    }

    #[test]
    fn test_missing_key_is_empty() {
        assert_eq!(render("{{missing}}", &Map::new()), "");
        assert_eq!(render("a{{x}}b", &data(json!({"x": null}))), "ab");
    }

    #[test]
    fn test_non_string_values() {
        let d = data(json!({"n": 0, "ok": true, "tags": ["a", "b"]}));
        assert_eq!(render("{{n}}|{{ok}}|{{tags}}", &d), r#"0|true|["a","b"]"#);
    }

    #[test]
    fn test_single_pass() {
        let d = data(json!({"a": "{{b}}", "b": "nested"}));
        assert_eq!(render("{{a}}", &d), "{{b}}");
    }

    #[test]
    fn test_non_identifier_placeholders_untouched() {
        let d = data(json!({"a b": "x"}));
        assert_eq!(render("{{a b}} {{ a }}", &d), "{{a b}} {{ a }}");
    }
}
