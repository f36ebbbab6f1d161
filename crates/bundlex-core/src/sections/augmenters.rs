//! Category-specific sections.

use super::SectionInput;
use crate::classifier::Category;
use crate::error::{BundleError, Result};
use crate::fields::unflatten;
use serde_json::{Map, Value};

fn section<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn input_data(input: &SectionInput) -> Value {
    Value::Object(input.bundle.input_data.clone())
}

fn optional_str(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

/// `trigger_fields` and `trigger_fields_raw`, both the flat input.
pub fn trigger_fields(input: &SectionInput) -> Result<Map<String, Value>> {
    Ok(section([
        ("trigger_fields", input_data(input)),
        ("trigger_fields_raw", input_data(input)),
    ]))
}

pub fn hook_catch(input: &SectionInput) -> Result<Map<String, Value>> {
    let cleaned = input
        .bundle
        .cleaned_request
        .clone()
        .ok_or(BundleError::MissingField {
            field: "cleanedRequest",
            category: Category::HookCatch,
        })?;
    Ok(section([("cleaned_request", cleaned)]))
}

pub fn hook_subscribe(input: &SectionInput) -> Result<Map<String, Value>> {
    Ok(section([
        ("target_url", optional_str(&input.bundle.target_url)),
        ("event", optional_str(&input.bundle.legacy_event)),
    ]))
}

pub fn hook_unsubscribe(input: &SectionInput) -> Result<Map<String, Value>> {
    let mut fields = hook_subscribe(input)?;
    fields.insert(
        "subscribe_data".into(),
        input.bundle.subscribe_data.clone().unwrap_or(Value::Null),
    );
    Ok(fields)
}

/// Creates are the only category whose fields are unflattened.
pub fn create_fields(input: &SectionInput) -> Result<Map<String, Value>> {
    let bundle = input.bundle;
    let raw = bundle
        .input_data_raw
        .as_ref()
        .unwrap_or(&bundle.input_data)
        .clone();
    Ok(section([
        ("action_fields", Value::Object(unflatten(&bundle.input_data))),
        ("action_fields_full", input_data(input)),
        ("action_fields_raw", Value::Object(raw)),
    ]))
}

pub fn search_fields(input: &SectionInput) -> Result<Map<String, Value>> {
    Ok(section([("search_fields", input_data(input))]))
}

pub fn search_resource(input: &SectionInput) -> Result<Map<String, Value>> {
    let read_fields = match &input.event.results {
        Some(results) => Value::Array(results.iter().cloned().map(Value::Object).collect()),
        None => Value::Null,
    };
    Ok(section([
        ("read_context", input_data(input)),
        ("read_fields", read_fields),
    ]))
}

pub fn oauth2(input: &SectionInput) -> Result<Map<String, Value>> {
    Ok(section([
        ("load", input_data(input)),
        ("oauth_data", input.credentials.to_oauth_data()),
    ]))
}

pub fn connection_label(input: &SectionInput) -> Result<Map<String, Value>> {
    Ok(section([("test_result", input_data(input))]))
}
