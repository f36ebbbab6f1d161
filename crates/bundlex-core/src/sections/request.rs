//! The legacy `request` section, and its conversion back into request options.

use crate::bundle::UnifiedBundle;
use crate::classifier::Category;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Build `{method, url, headers, params, data}` for a category.
///
/// GET requests carry `inputData` as `params` with an empty `data`; every
/// other method sends it JSON-encoded in `data` with empty `params`. Hook
/// catch also gets `querystring` and `content`.
pub fn build_request(bundle: &UnifiedBundle, category: Category) -> Map<String, Value> {
    let method = category.method();
    let (params, data) = if method.carries_body() {
        (Map::new(), js_numbers(&Value::Object(bundle.input_data.clone())).to_string())
    } else {
        (bundle.input_data.clone(), String::new())
    };

    let mut request = Map::new();
    request.insert("method".into(), json!(method.as_str()));
    request.insert("url".into(), json!(bundle.resolved_url));
    request.insert(
        "headers".into(),
        json!({ "Content-Type": CONTENT_TYPE_JSON }),
    );
    request.insert("params".into(), Value::Object(params));
    request.insert("data".into(), Value::String(data));

    if category == Category::HookCatch {
        request.insert(
            "querystring".into(),
            Value::String(encode_querystring(&bundle.input_data)),
        );
        request.insert("content".into(), Value::String(String::new()));
    }

    request
}

/// Form-encode a mapping the way legacy hosts build query strings: arrays
/// repeat the key, objects and nulls encode as empty values.
pub fn encode_querystring(fields: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in fields {
        let key = escape_component(key);
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{}={}", key, escape_component(&primitive_text(item))));
                }
            }
            other => pairs.push(format!("{}={}", key, escape_component(&primitive_text(other)))),
        }
    }
    pairs.join("&")
}

/// Percent-encode like a legacy host does, which leaves `!'()*` unescaped.
fn escape_component(text: &str) -> String {
    urlencoding::encode(text)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

fn primitive_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(_) => js_numbers(value).to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

// Largest integer a script runtime represents exactly (2^53).
const MAX_SAFE_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

/// Rewrite whole-valued floats as integers so `1.0` prints as `1`, the way
/// script runtimes serialize numbers.
fn js_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_FLOAT_INT => Value::from(f as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(js_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), js_numbers(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Request options recovered from a legacy `request` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoredRequest {
    pub method: String,
    pub url: Option<String>,
    pub headers: Map<String, Value>,
    pub params: Map<String, Value>,
    pub body: Option<String>,
}

/// Convert a legacy `request` section, possibly rewritten by a legacy
/// script, back into request options. Unexpected shapes fall back to
/// defaults rather than failing.
pub fn restore_request(legacy: &Map<String, Value>) -> RestoredRequest {
    let method = legacy
        .get("method")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(|m| m.trim().to_uppercase())
        .unwrap_or_else(|| "GET".to_string());

    let url = legacy
        .get("url")
        .and_then(Value::as_str)
        .map(str::to_string);

    let object_field = |name: &str| match legacy.get(name) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    let body = match legacy.get("data") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    RestoredRequest {
        method,
        url,
        headers: object_field("headers"),
        params: object_field("params"),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(input: Value) -> UnifiedBundle {
        UnifiedBundle::new("https://example.com/api").with_input(input.as_object().cloned().unwrap())
    }

    #[test]
    fn get_request_uses_params() {
        let request = build_request(&bundle(json!({"user": "Zapier"})), Category::TriggerPoll);
        assert_eq!(
            Value::Object(request),
            json!({
                "method": "GET",
                "url": "https://example.com/api",
                "headers": {"Content-Type": "application/json"},
                "params": {"user": "Zapier"},
                "data": ""
            })
        );
    }

    #[test]
    fn create_request_serializes_data() {
        let request = build_request(&bundle(json!({"title": "It", "n": 2})), Category::Create);
        assert_eq!(request["method"], json!("POST"));
        assert_eq!(request["params"], json!({}));
        assert_eq!(request["data"], json!(r#"{"title":"It","n":2}"#));
        assert!(!request.contains_key("querystring"));
    }

    #[test]
    fn unsubscribe_uses_delete() {
        let request = build_request(&bundle(json!({})), Category::HookUnsubscribe);
        assert_eq!(request["method"], json!("DELETE"));
        assert_eq!(request["data"], json!("{}"));
    }

    #[test]
    fn hook_catch_adds_querystring_and_content() {
        let request = build_request(
            &bundle(json!({"name": "a b", "n": 1, "tags": ["x", "y"]})),
            Category::HookCatch,
        );
        assert_eq!(request["querystring"], json!("name=a%20b&n=1&tags=x&tags=y"));
        assert_eq!(request["content"], json!(""));
        assert_eq!(request["method"], json!("GET"));
    }

    #[test]
    fn missing_url_is_null() {
        let request = build_request(&UnifiedBundle::default(), Category::Session);
        assert_eq!(request["url"], Value::Null);
    }

    #[test]
    fn querystring_encodes_reserved_characters() {
        let fields = json!({"q": "a&b=c", "empty": null, "obj": {"k": 1}});
        assert_eq!(
            encode_querystring(fields.as_object().unwrap()),
            "q=a%26b%3Dc&empty=&obj="
        );
    }

    #[test]
    fn querystring_keeps_script_safe_punctuation() {
        let fields = json!({"q": "it's (very) good!*", "tilde": "a~b"});
        assert_eq!(
            encode_querystring(fields.as_object().unwrap()),
            "q=it's%20(very)%20good!*&tilde=a~b"
        );
    }

    #[test]
    fn whole_floats_print_as_integers() {
        let fields = json!({"n": 1.0, "f": 2.5, "list": [3.0]});
        assert_eq!(
            encode_querystring(fields.as_object().unwrap()),
            "n=1&f=2.5&list=3"
        );

        let request = build_request(&bundle(fields), Category::Create);
        assert_eq!(request["data"], json!(r#"{"n":1,"f":2.5,"list":[3]}"#));
    }

    #[test]
    fn restores_script_modified_request() {
        let legacy = json!({
            "method": "put",
            "url": "https://example.com/items/1",
            "headers": {"Content-Type": "application/json", "X-Token": "t"},
            "params": {},
            "data": "{\"a\":1}"
        });
        let restored = restore_request(legacy.as_object().unwrap());
        assert_eq!(restored.method, "PUT");
        assert_eq!(restored.url.as_deref(), Some("https://example.com/items/1"));
        assert_eq!(restored.headers.get("X-Token"), Some(&json!("t")));
        assert_eq!(restored.body.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn restore_drops_empty_body_and_defaults_method() {
        let legacy = json!({"url": "u", "params": {"a": 1}, "data": "", "headers": "bad"});
        let restored = restore_request(legacy.as_object().unwrap());
        assert_eq!(restored.method, "GET");
        assert!(restored.body.is_none());
        assert!(restored.headers.is_empty());
        assert_eq!(restored.params.get("a"), Some(&json!(1)));
    }

    #[test]
    fn restore_serializes_object_data() {
        let legacy = json!({"method": "POST", "data": {"a": 1}});
        let restored = restore_request(legacy.as_object().unwrap());
        assert_eq!(restored.body.as_deref(), Some(r#"{"a":1}"#));
        assert!(restored.url.is_none());
    }

    #[test]
    fn round_trips_built_request() {
        let built = build_request(&bundle(json!({"title": "It"})), Category::Create);
        let restored = restore_request(&built);
        assert_eq!(restored.method, "POST");
        assert_eq!(restored.url.as_deref(), Some("https://example.com/api"));
        assert_eq!(restored.body.as_deref(), Some(r#"{"title":"It"}"#));
        assert!(restored.params.is_empty());
    }
}
