// Connection settings shared by the model and bucket clients

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{DialError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_COMPLETIONS_ENDPOINT: &str =
    "{base_url}/openai/deployments/{model}/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gateway connection configuration
///
/// `completions_endpoint` is a template: `{base_url}` and `{model}` are
/// substituted per request, so a fully spelled-out URL works as well.
/// The API key is never serialized and shows as `[REDACTED]` in `Debug`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_completions_endpoint")]
    pub completions_endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_completions_endpoint() -> String {
    DEFAULT_COMPLETIONS_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            completions_endpoint: default_completions_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "[REDACTED]" };
        f.debug_struct("ClientConfig")
            .field("api_key", &api_key)
            .field("base_url", &self.base_url)
            .field("completions_endpoint", &self.completions_endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_completions_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.completions_endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint template with `{base_url}` resolved; `{model}` is left in place
    pub fn completions_template(&self) -> String {
        self.completions_endpoint
            .replace("{base_url}", self.base_url())
    }

    /// Full chat-completions URL for a deployment
    pub fn completions_url(&self, deployment_name: &str) -> String {
        self.completions_template().replace("{model}", deployment_name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(DialError::Config("API key is required".to_string()));
        }
        if self.base_url().is_empty() {
            return Err(DialError::Config("Base URL is required".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(DialError::Config("Timeout must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_from_template() {
        let config = ClientConfig::new("key", "https://dial.example.com/");
        assert_eq!(
            config.completions_url("gpt-4o"),
            "https://dial.example.com/openai/deployments/gpt-4o/chat/completions"
        );
    }

    #[test]
    fn test_completions_url_literal_endpoint() {
        let config = ClientConfig::new("key", "https://dial.example.com")
            .with_completions_endpoint("https://other.example.com/v1/{model}/chat");
        assert_eq!(
            config.completions_url("dall-e-3"),
            "https://other.example.com/v1/dall-e-3/chat"
        );
    }

    #[test]
    fn test_validate_requires_api_key() {
        let err = ClientConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_api_key_not_exposed() {
        let config = ClientConfig::new("secret-key", "https://dial.example.com");

        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("https://dial.example.com"));

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("api_key").is_none());
        assert_eq!(json["base_url"], "https://dial.example.com");
    }

    #[test]
    fn test_serde_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"api_key":"k"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }
}
