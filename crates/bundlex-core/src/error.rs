//! Error types for legacy bundle translation.

use crate::classifier::Category;
use thiserror::Error;

/// Errors raised while translating a unified bundle into a legacy bundle.
///
/// Every variant is fatal for the invocation: no partial bundle is produced
/// and the legacy script must not run.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Unknown event '{name}'{}", .key.as_deref().map(|k| format!(" (key '{k}')")).unwrap_or_default())]
    Classification { name: String, key: Option<String> },

    #[error("Missing required bundle field '{field}' for {}", .category.label())]
    MissingField {
        field: &'static str,
        category: Category,
    },

    #[error("Event '{event}' is a post phase but carries no response")]
    ResponseMissing { event: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BundleError>;
