//! Backend memory API configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the outbound memory API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the memory API, e.g. `https://memory.example.com`.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Versioned prefix prepended to every endpoint path.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_prefix: default_api_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// The configured base URL without a trailing slash, if any.
    pub fn base_url(&self) -> Option<String> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| u.trim_end_matches('/').to_string())
    }
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = BackendConfig {
            api_url: Some("https://memory.example.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url().as_deref(), Some("https://memory.example.com"));
    }

    #[test]
    fn test_blank_base_url_is_missing() {
        let config = BackendConfig {
            api_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.base_url().is_none());
        assert!(BackendConfig::default().base_url().is_none());
    }
}
