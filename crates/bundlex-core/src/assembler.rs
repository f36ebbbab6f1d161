use crate::bundle::{EventDescriptor, UnifiedBundle};
use crate::classifier::{classify, Category, Phase};
use crate::credentials::ClientCredentials;
use crate::error::Result;
use crate::sections::{self, response, SectionInput};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The bundle handed to a legacy script, tagged with the category it was
/// built for. Serializes as the flat legacy object.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyBundle {
    category: Category,
    phase: Phase,
    fields: Map<String, Value>,
}

impl LegacyBundle {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn request(&self) -> Option<&Map<String, Value>> {
        self.fields.get("request").and_then(Value::as_object)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Serialize for LegacyBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Translate a unified bundle into the legacy bundle for `event`.
///
/// Runs the universal sections, then the category's sections, then the
/// response section for post phases, and merges their output in that order.
/// Pure: nothing outside the arguments is read and nothing is retained.
pub fn assemble(
    bundle: &UnifiedBundle,
    event: &EventDescriptor,
    credentials: &ClientCredentials,
) -> Result<LegacyBundle> {
    let classified = classify(&event.name, event.key.as_deref())?;
    let input = SectionInput {
        bundle,
        event,
        classified,
        credentials,
    };

    let category_sections = sections::category_sections(classified.category);
    let mut parts = Vec::with_capacity(sections::UNIVERSAL.len() + category_sections.len() + 1);
    for section in sections::UNIVERSAL.iter().chain(category_sections) {
        parts.push(section(&input)?);
    }
    if classified.phase.is_post() {
        parts.push(response::response_section(event)?);
    }

    let fields = sections::merge(parts);
    tracing::debug!(
        event = %event.name,
        category = ?classified.category,
        phase = ?classified.phase,
        keys = fields.len(),
        "assembled legacy bundle"
    );

    Ok(LegacyBundle {
        category: classified.category,
        phase: classified.phase,
        fields,
    })
}

/// [`assemble`] over raw JSON inputs in the unified camelCase shape.
pub fn assemble_json(
    bundle: &Value,
    event: &Value,
    credentials: &ClientCredentials,
) -> Result<LegacyBundle> {
    let bundle: UnifiedBundle = serde_json::from_value(bundle.clone())?;
    let event: EventDescriptor = serde_json::from_value(event.clone())?;
    assemble(&bundle, &event, credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BundleError;
    use serde_json::json;

    fn creds() -> ClientCredentials {
        ClientCredentials::new("id", "secret")
    }

    #[test]
    fn poll_bundle_layout() {
        let bundle = UnifiedBundle::new("https://zapier.com")
            .with_input(json!({"user": "Zapier"}).as_object().cloned().unwrap());
        let legacy = assemble(&bundle, &EventDescriptor::new("trigger.poll"), &creds()).unwrap();

        assert_eq!(legacy.category(), Category::TriggerPoll);
        assert_eq!(legacy.phase(), Phase::Pre);
        let keys: Vec<&str> = legacy.keys().collect();
        assert_eq!(
            keys,
            [
                "request",
                "auth_fields",
                "meta",
                "zap",
                "url_raw",
                "trigger_fields",
                "trigger_fields_raw"
            ]
        );
    }

    #[test]
    fn response_comes_last() {
        let bundle = UnifiedBundle::new("u");
        let event = EventDescriptor::new("search.post").with_response(200, "[]");
        let legacy = assemble(&bundle, &event, &creds()).unwrap();
        assert_eq!(legacy.keys().last(), Some("response"));
    }

    #[test]
    fn post_without_response_fails() {
        let err = assemble(
            &UnifiedBundle::new("u"),
            &EventDescriptor::new("create.post"),
            &creds(),
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::ResponseMissing { .. }));
    }

    #[test]
    fn pre_phase_ignores_stray_response() {
        let event = EventDescriptor::new("create.write").with_response(500, "boom");
        let legacy = assemble(&UnifiedBundle::new("u"), &event, &creds()).unwrap();
        assert!(!legacy.contains_key("response"));
    }

    #[test]
    fn serializes_flat() {
        let legacy = assemble(
            &UnifiedBundle::new("u"),
            &EventDescriptor::new("auth.session"),
            &creds(),
        )
        .unwrap();
        let value = serde_json::to_value(&legacy).unwrap();
        assert_eq!(value["zap"], json!({"id": 0}));
        assert_eq!(value, legacy.clone().into_value());
    }

    #[test]
    fn json_entry_point_reports_bad_input() {
        let err = assemble_json(&json!({"inputData": 5}), &json!({"name": "trigger.poll"}), &creds())
            .unwrap_err();
        assert!(matches!(err, BundleError::Json(_)));
    }
}
