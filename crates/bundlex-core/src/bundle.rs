use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The unified per-invocation context handed to the engine.
///
/// `resolved_url` must already have every `{{...}}` placeholder substituted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedBundle {
    #[serde(default)]
    pub resolved_url: Option<String>,
    #[serde(default)]
    pub input_data: Map<String, Value>,
    /// Field values before template substitution.
    #[serde(default)]
    pub input_data_raw: Option<Map<String, Value>>,
    #[serde(default)]
    pub auth_data: Option<Map<String, Value>>,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub legacy_event: Option<String>,
    /// Normalized inbound webhook payload, required for hook catch.
    #[serde(default)]
    pub cleaned_request: Option<Value>,
    /// Result of an earlier subscribe call, used by unsubscribe.
    #[serde(default)]
    pub subscribe_data: Option<Value>,
}

impl UnifiedBundle {
    pub fn new(resolved_url: impl Into<String>) -> Self {
        Self {
            resolved_url: Some(resolved_url.into()),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, input_data: Map<String, Value>) -> Self {
        self.input_data = input_data;
        self
    }

    pub fn with_auth(mut self, auth_data: Map<String, Value>) -> Self {
        self.auth_data = Some(auth_data);
        self
    }
}

/// Status and body captured by the HTTP executor for a post phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamResponse {
    pub status: u16,
    #[serde(default)]
    pub content: String,
}

/// Names the step being translated and carries phase-specific inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub name: String,
    /// Discriminator separating webhook catch (`hook`) from other trigger phases.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub response: Option<UpstreamResponse>,
    /// Records read back for resource-read events.
    #[serde(default)]
    pub results: Option<Vec<Map<String, Value>>>,
}

impl EventDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_response(mut self, status: u16, content: impl Into<String>) -> Self {
        self.response = Some(UpstreamResponse {
            status,
            content: content.into(),
        });
        self
    }

    pub fn with_results(mut self, results: Vec<Map<String, Value>>) -> Self {
        self.results = Some(results);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_bundle() {
        let bundle: UnifiedBundle = serde_json::from_value(json!({
            "resolvedUrl": "https://example.com/items",
            "inputData": {"user": "Zapier"},
            "inputDataRaw": {"user": "{{user}}"},
            "authData": {"apiKey": "K"},
            "targetUrl": "https://hooks.example.com/1",
            "legacyEvent": "item.created"
        }))
        .unwrap();

        assert_eq!(bundle.resolved_url.as_deref(), Some("https://example.com/items"));
        assert_eq!(bundle.input_data.get("user"), Some(&json!("Zapier")));
        assert_eq!(
            bundle.input_data_raw.unwrap().get("user"),
            Some(&json!("{{user}}"))
        );
        assert_eq!(bundle.legacy_event.as_deref(), Some("item.created"));
        assert!(bundle.meta.is_none());
        assert!(bundle.cleaned_request.is_none());
    }

    #[test]
    fn missing_fields_default() {
        let bundle: UnifiedBundle = serde_json::from_value(json!({})).unwrap();
        assert!(bundle.resolved_url.is_none());
        assert!(bundle.input_data.is_empty());

        let event: EventDescriptor = serde_json::from_value(json!({"name": "auth.session"})).unwrap();
        assert_eq!(event, EventDescriptor::new("auth.session"));
    }

    #[test]
    fn deserializes_event_response() {
        let event: EventDescriptor = serde_json::from_value(json!({
            "name": "create.post",
            "response": {"status": 201, "content": "{}"}
        }))
        .unwrap();
        assert_eq!(event, EventDescriptor::new("create.post").with_response(201, "{}"));
    }
}
