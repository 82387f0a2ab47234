//! Client configuration.
//!
//! [`ClientConfig`] is what the clients are built from. [`Settings`] is the serializable
//! shape loaded from config files, merged with the environment before use.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Analysis endpoint of the current API version.
pub const DEFAULT_ENDPOINT: &str = "https://api.codeq.com/v1";

/// Field vocabulary the typed accessors follow. Matches the version in [`DEFAULT_ENDPOINT`].
pub const SCHEMA_VERSION: &str = "v1";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const ENV_USER_ID: &str = "CODEQ_USER_ID";
pub const ENV_USER_KEY: &str = "CODEQ_USER_KEY";
pub const ENV_ENDPOINT: &str = "CODEQ_ENDPOINT";
pub const ENV_TIMEOUT_SECONDS: &str = "CODEQ_TIMEOUT_SECONDS";

/// Settings for an analysis client.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use codeq_nlp_api::ClientConfig;
///
/// let config = ClientConfig::new("my-user-id", "my-user-key")
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.endpoint, codeq_nlp_api::DEFAULT_ENDPOINT);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL requests are POSTed to
    pub endpoint: String,
    pub user_id: String,
    /// Sent in the request body only
    pub user_key: SecretString,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(user_id: impl Into<String>, user_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_id: user_id.into(),
            user_key: SecretString::from(user_key.into()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `CODEQ_USER_ID`, `CODEQ_USER_KEY` and the optional `CODEQ_ENDPOINT` and
    /// `CODEQ_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self> {
        Settings::default().merge_env()?.into_client_config()
    }
}

/// File representation of [`ClientConfig`].
///
/// ```rust
/// use codeq_nlp_api::Settings;
/// use serde_json::json;
///
/// let settings: Settings = serde_json::from_value(json!({
///     "user_id": "my-user-id",
///     "user_key": "my-user-key",
///     "timeout_seconds": 5
/// }))
/// .unwrap();
/// let config = settings.into_client_config().unwrap();
/// assert_eq!(config.timeout.as_secs(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Never written back out
    #[serde(default, skip_serializing)]
    pub user_key: Option<SecretString>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_id: None,
            user_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Settings {
    /// Overrides fields with any `CODEQ_*` variables that are set.
    pub fn merge_env(self) -> Result<Self> {
        self.merge_from(|name| std::env::var(name).ok())
    }

    fn merge_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(user_id) = lookup(ENV_USER_ID) {
            self.user_id = Some(user_id);
        }
        if let Some(user_key) = lookup(ENV_USER_KEY) {
            self.user_key = Some(SecretString::from(user_key));
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECONDS) {
            self.timeout_seconds = timeout
                .trim()
                .parse()
                .map_err(|_| Error::InvalidSetting {
                    name: ENV_TIMEOUT_SECONDS,
                    value: timeout,
                })?;
        }
        Ok(self)
    }

    pub fn into_client_config(self) -> Result<ClientConfig> {
        let user_id = self
            .user_id
            .ok_or(Error::MissingCredential { name: "user_id" })?;
        let user_key = self
            .user_key
            .ok_or(Error::MissingCredential { name: "user_key" })?;
        if self.timeout_seconds == 0 {
            return Err(Error::InvalidSetting {
                name: "timeout_seconds",
                value: "0".to_owned(),
            });
        }
        Ok(ClientConfig {
            endpoint: self.endpoint,
            user_id,
            user_key,
            timeout: Duration::from_secs(self.timeout_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_current_api() {
        let config = ClientConfig::new("id", "key");
        assert_eq!(config.endpoint, "https://api.codeq.com/v1");
        assert!(config.endpoint.ends_with(SCHEMA_VERSION));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.user_key.expose_secret(), "key");
    }

    #[test]
    fn settings_fill_defaults() {
        let settings: Settings = serde_json::from_value(json!({"user_id": "id"})).unwrap();
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.timeout_seconds, 60);

        let err = settings.into_client_config().unwrap_err();
        assert!(matches!(err, Error::MissingCredential { name: "user_key" }));
    }

    #[test]
    fn user_key_is_never_serialized() {
        let settings: Settings =
            serde_json::from_value(json!({"user_id": "id", "user_key": "secret"})).unwrap();
        let written = serde_json::to_string(&settings).unwrap();
        assert!(!written.contains("secret"));
        assert!(!format!("{settings:?}").contains("secret"));
    }

    #[test]
    fn environment_overrides_file_values() {
        let settings = Settings {
            endpoint: "http://file".to_string(),
            user_id: Some("file-id".to_string()),
            user_key: None,
            timeout_seconds: 5,
        };
        let config = settings
            .merge_from(lookup(&[
                (ENV_USER_KEY, "env-key"),
                (ENV_TIMEOUT_SECONDS, "7"),
            ]))
            .unwrap()
            .into_client_config()
            .unwrap();

        assert_eq!(config.endpoint, "http://file");
        assert_eq!(config.user_id, "file-id");
        assert_eq!(config.user_key.expose_secret(), "env-key");
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn bad_timeout_is_reported() {
        let err = Settings::default()
            .merge_from(lookup(&[(ENV_TIMEOUT_SECONDS, "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting { name: ENV_TIMEOUT_SECONDS, .. }
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let settings = Settings::default()
            .merge_from(lookup(&[
                (ENV_USER_ID, "id"),
                (ENV_USER_KEY, "key"),
                (ENV_TIMEOUT_SECONDS, "0"),
            ]))
            .unwrap();

        let err = settings.into_client_config().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting { name: "timeout_seconds", .. }
        ));
    }
}
