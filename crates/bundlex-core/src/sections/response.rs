use crate::bundle::EventDescriptor;
use crate::error::{BundleError, Result};
use serde_json::{json, Map, Value};

/// Wrap the upstream response for a post phase.
///
/// `status_code` repeats `status` under the name older scripts still read.
pub fn response_section(event: &EventDescriptor) -> Result<Map<String, Value>> {
    let response = event
        .response
        .as_ref()
        .ok_or_else(|| BundleError::ResponseMissing {
            event: event.name.clone(),
        })?;

    let mut section = Map::new();
    section.insert(
        "response".into(),
        json!({
            "status": response.status,
            "status_code": response.status,
            "content": response.content,
        }),
    );
    Ok(section)
}
