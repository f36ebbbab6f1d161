//! OAuth2 client credentials for the `oauth_data` section.
//!
//! Credentials come from the app's environment (`CLIENT_ID`,
//! `CLIENT_SECRET`) and may be overridden by a TOML config file. They are
//! never read from the unified bundle.

use crate::error::{BundleError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

pub const CLIENT_ID_VAR: &str = "CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "CLIENT_SECRET";

/// The app's configured OAuth2 client.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientCredentials {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

// Keeps the secret out of debug logs.
impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
        }
    }

    /// Read `CLIENT_ID` / `CLIENT_SECRET` from the process environment.
    /// Unset or blank variables are left empty.
    pub fn from_env() -> Self {
        Self {
            client_id: non_blank_env(CLIENT_ID_VAR),
            client_secret: non_blank_env(CLIENT_SECRET_VAR),
        }
    }

    /// Fill each value from `other` where `other` has one.
    pub fn overlay(mut self, other: &ClientCredentials) -> Self {
        if other.client_id.is_some() {
            self.client_id = other.client_id.clone();
        }
        if other.client_secret.is_some() {
            self.client_secret = other.client_secret.clone();
        }
        self
    }

    pub fn is_complete(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// The legacy `oauth_data` object. Missing values become `null`.
    pub fn to_oauth_data(&self) -> Value {
        json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret,
        })
    }
}

fn non_blank_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Engine configuration file, e.g. `bundlex.toml`:
///
/// ```toml
/// [oauth2]
/// client_id = "abc"
/// client_secret = "xyz"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub oauth2: ClientCredentials,
}

/// Load engine configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BundleError::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    toml::from_str(&content).map_err(|e| {
        BundleError::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Environment credentials, overridden by the config file when one is given.
pub fn resolve_credentials(config_path: Option<&Path>) -> Result<ClientCredentials> {
    let env = ClientCredentials::from_env();
    let Some(path) = config_path else {
        return Ok(env);
    };
    let config = load_config(path)?;
    Ok(env.overlay(&config.oauth2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn oauth_data_shape() {
        let creds = ClientCredentials::new("id", "secret");
        assert_eq!(
            creds.to_oauth_data(),
            json!({"client_id": "id", "client_secret": "secret"})
        );
        assert_eq!(
            ClientCredentials::default().to_oauth_data(),
            json!({"client_id": null, "client_secret": null})
        );
    }

    #[test]
    fn overlay_prefers_present_values() {
        let base = ClientCredentials::new("env-id", "env-secret");
        let file = ClientCredentials {
            client_id: Some("file-id".to_string()),
            client_secret: None,
        };
        let merged = base.overlay(&file);
        assert_eq!(merged.client_id.as_deref(), Some("file-id"));
        assert_eq!(merged.client_secret.as_deref(), Some("env-secret"));
        assert!(merged.is_complete());
    }

    #[test]
    fn loads_toml_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[oauth2]\nclient_id = \"abc\"\nclient_secret = \"xyz\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.oauth2, ClientCredentials::new("abc", "xyz"));
    }

    #[test]
    fn empty_config_is_valid() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.oauth2, ClientCredentials::default());
    }

    #[test]
    fn invalid_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[oauth2\nclient_id = ").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, BundleError::Config(_)));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(Path::new("/nonexistent/bundlex.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", ClientCredentials::new("id", "hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("id"));
    }
}
