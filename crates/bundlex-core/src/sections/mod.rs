//! Sections are the pure building blocks of a legacy bundle. Each one
//! produces a partial mapping; the assembler merges them in order.

pub mod augmenters;
pub mod request;
pub mod response;

use crate::bundle::{EventDescriptor, UnifiedBundle};
use crate::classifier::{Category, ClassifiedEvent};
use crate::credentials::ClientCredentials;
use crate::error::Result;
use serde_json::{json, Map, Value};

/// Everything a section may read. Sections never mutate it.
pub struct SectionInput<'a> {
    pub bundle: &'a UnifiedBundle,
    pub event: &'a EventDescriptor,
    pub classified: ClassifiedEvent,
    pub credentials: &'a ClientCredentials,
}

pub type Section = fn(&SectionInput<'_>) -> Result<Map<String, Value>>;

/// Present in every legacy bundle, in this order.
pub const UNIVERSAL: &[Section] = &[request_section, auth_fields, meta, zap, url_raw];

const TRIGGER: &[Section] = &[augmenters::trigger_fields];
const HOOK_CATCH: &[Section] = &[augmenters::trigger_fields, augmenters::hook_catch];
const HOOK_SUBSCRIBE: &[Section] = &[augmenters::trigger_fields, augmenters::hook_subscribe];
const HOOK_UNSUBSCRIBE: &[Section] = &[augmenters::trigger_fields, augmenters::hook_unsubscribe];
const CREATE: &[Section] = &[augmenters::create_fields];
const SEARCH: &[Section] = &[augmenters::search_fields];
const SEARCH_RESOURCE: &[Section] = &[augmenters::search_fields, augmenters::search_resource];
const OAUTH2: &[Section] = &[augmenters::oauth2];
const CONNECTION_LABEL: &[Section] = &[augmenters::connection_label];

/// Category sections applied after the universal ones.
pub fn category_sections(category: Category) -> &'static [Section] {
    match category {
        Category::TriggerPoll | Category::HookPrePost => TRIGGER,
        Category::HookCatch => HOOK_CATCH,
        Category::HookSubscribe => HOOK_SUBSCRIBE,
        Category::HookUnsubscribe => HOOK_UNSUBSCRIBE,
        Category::Create => CREATE,
        Category::Search => SEARCH,
        Category::SearchResource => SEARCH_RESOURCE,
        Category::OAuth2TokenRefresh => OAUTH2,
        Category::ConnectionLabel => CONNECTION_LABEL,
        Category::Session => &[],
    }
}

/// Shallow-merge section outputs left to right; later keys win.
pub fn merge<I>(parts: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    let mut merged = Map::new();
    for part in parts {
        for (key, value) in part {
            debug_assert!(
                !merged.contains_key(&key),
                "legacy bundle key '{key}' produced by two sections"
            );
            merged.insert(key, value);
        }
    }
    merged
}

fn request_section(input: &SectionInput<'_>) -> Result<Map<String, Value>> {
    let request = request::build_request(input.bundle, input.classified.category);
    Ok(single("request", Value::Object(request)))
}

fn auth_fields(input: &SectionInput<'_>) -> Result<Map<String, Value>> {
    let auth = input.bundle.auth_data.clone().unwrap_or_default();
    Ok(single("auth_fields", Value::Object(auth)))
}

fn meta(input: &SectionInput<'_>) -> Result<Map<String, Value>> {
    let meta = input.bundle.meta.clone().unwrap_or_default();
    Ok(single("meta", Value::Object(meta)))
}

fn zap(_input: &SectionInput<'_>) -> Result<Map<String, Value>> {
    Ok(single("zap", json!({ "id": 0 })))
}

fn url_raw(input: &SectionInput<'_>) -> Result<Map<String, Value>> {
    Ok(single("url_raw", json!(input.bundle.resolved_url)))
}

fn single(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}
