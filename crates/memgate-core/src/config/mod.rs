//! Configuration types for the memgate gateway.
//!
//! Configuration is loaded from a single YAML file (`memgate.yaml` by default)
//! and then overlaid with environment variables, so that deployment secrets and
//! per-environment URLs never need to live in the file.
//!
//! # Environment overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MEMGATE_PROJECT_ID` | `identity.project_id` |
//! | `MEMGATE_CLIENT_URL` | `identity.client_url` |
//! | `MEMGATE_API_URL` | `backend.api_url` |
//! | `MEMGATE_HOST` | `mcp.host` |
//! | `MEMGATE_PORT` | `mcp.port` |

pub mod backend;
pub mod identity;
pub mod mcp;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use backend::BackendConfig;
pub use identity::IdentityConfig;
pub use mcp::McpConfig;

/// Complete gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// HTTP surface of the MCP endpoint.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Identity provider used to verify bearer tokens.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Backend memory API.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Empty values are ignored so that an exported-but-blank variable does not
    /// wipe out a value from the file.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("MEMGATE_PROJECT_ID") {
            self.identity.project_id = v;
        }
        if let Some(v) = get("MEMGATE_CLIENT_URL") {
            self.identity.client_url = v;
        }
        if let Some(v) = get("MEMGATE_API_URL") {
            self.backend.api_url = Some(v);
        }
        if let Some(v) = get("MEMGATE_HOST") {
            self.mcp.host = v;
        }
        if let Some(v) = get("MEMGATE_PORT") {
            self.mcp.port = v
                .parse()
                .map_err(|_| ConfigError::Config(format!("MEMGATE_PORT is not a port: {v}")))?;
        }
        Ok(())
    }

    /// Check the settings the gateway cannot start without.
    ///
    /// A missing backend URL is not fatal here; every tool call fails with a
    /// configuration error instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.project_id.trim().is_empty() {
            return Err(ConfigError::Config(
                "identity.project_id is required (or set MEMGATE_PROJECT_ID)".to_string(),
            ));
        }
        if !self.mcp.path.starts_with('/') {
            return Err(ConfigError::Config(format!(
                "mcp.path must start with '/': {}",
                self.mcp.path
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = GatewayConfig::from_yaml("{}").unwrap();
        assert_eq!(config.mcp.port, 8787);
        assert_eq!(config.mcp.path, "/mcp");
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.backend.api_url.is_none());
        assert_eq!(config.identity.jwks_timeout_secs, 10);
        assert_eq!(config.identity.jwks_refresh_cooldown_secs, 30);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "identity:\n  project_id: project-live-123\n  client_url: https://app.example.com\nbackend:\n  api_url: https://api.example.com/\n"
        )
        .unwrap();

        let config = GatewayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.identity.project_id, "project-live-123");
        assert_eq!(
            config.backend.base_url().as_deref(),
            Some("https://api.example.com")
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config =
            GatewayConfig::from_yaml("identity:\n  project_id: from-file\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("MEMGATE_PROJECT_ID", "project-test-1"),
            ("MEMGATE_API_URL", "http://localhost:9000"),
            ("MEMGATE_PORT", "9999"),
            ("MEMGATE_CLIENT_URL", "   "),
        ]);

        config
            .apply_env_with(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.identity.project_id, "project-test-1");
        assert_eq!(config.backend.api_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.mcp.port, 9999);
        // Blank values are ignored.
        assert_eq!(config.identity.client_url, "");
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = GatewayConfig::default();
        let result = config.apply_env_with(|k| (k == "MEMGATE_PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_validate_requires_project_id() {
        let config = GatewayConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Config(_))));
    }
}
