//! Identity provider configuration.
//!
//! The provider publishes its keys and OAuth endpoints under a public base URL
//! that depends on whether the project is a test or a live project. Project ids
//! containing `"test"` are served from the test environment.

use serde::{Deserialize, Serialize};

/// Public API base for test projects.
pub const TEST_PUBLIC_BASE_URL: &str = "https://test.stytch.com/v1/public";

/// Public API base for live projects.
pub const LIVE_PUBLIC_BASE_URL: &str = "https://api.stytch.com/v1/public";

/// Configuration for bearer token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Project (tenant) identifier at the identity provider. Doubles as the
    /// expected token audience.
    #[serde(default)]
    pub project_id: String,

    /// Base URL of the UI that hosts the OAuth authorization screen.
    #[serde(default)]
    pub client_url: String,

    /// Overrides the test/live public base URL selection.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Overrides the expected `iss` claim (default `stytch.com/{project_id}`).
    #[serde(default)]
    pub issuer: Option<String>,

    /// Timeout for fetching the key set, in seconds.
    #[serde(default = "default_jwks_timeout_secs")]
    pub jwks_timeout_secs: u64,

    /// Minimum time between key set refetches caused by an unknown key id.
    #[serde(default = "default_jwks_refresh_cooldown_secs")]
    pub jwks_refresh_cooldown_secs: u64,

    /// Clock skew tolerated on `exp`/`nbf`, in seconds.
    #[serde(default)]
    pub leeway_secs: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            client_url: String::new(),
            public_base_url: None,
            issuer: None,
            jwks_timeout_secs: default_jwks_timeout_secs(),
            jwks_refresh_cooldown_secs: default_jwks_refresh_cooldown_secs(),
            leeway_secs: 0,
        }
    }
}

impl IdentityConfig {
    /// Whether the project lives in the provider's test environment.
    pub fn is_test_project(&self) -> bool {
        self.project_id.contains("test")
    }

    /// Public API base URL, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match self.public_base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ if self.is_test_project() => TEST_PUBLIC_BASE_URL.to_string(),
            _ => LIVE_PUBLIC_BASE_URL.to_string(),
        }
    }

    /// URL of a project-scoped public endpoint, e.g. `oauth2/token`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url(),
            self.project_id,
            endpoint.trim_start_matches('/')
        )
    }

    /// URL of the published JSON Web Key Set.
    pub fn jwks_url(&self) -> String {
        self.endpoint_url(".well-known/jwks.json")
    }

    /// The only `iss` value accepted on tokens.
    pub fn expected_issuer(&self) -> String {
        match self.issuer.as_deref() {
            Some(iss) if !iss.trim().is_empty() => iss.to_string(),
            _ => format!("stytch.com/{}", self.project_id),
        }
    }

    /// The only `aud` value accepted on tokens.
    pub fn expected_audience(&self) -> &str {
        &self.project_id
    }
}

fn default_jwks_timeout_secs() -> u64 {
    10
}

fn default_jwks_refresh_cooldown_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(project_id: &str) -> IdentityConfig {
        IdentityConfig {
            project_id: project_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_environment_selected_by_project_id() {
        assert_eq!(
            config("project-test-abc").public_base_url(),
            TEST_PUBLIC_BASE_URL
        );
        assert_eq!(
            config("project-live-abc").public_base_url(),
            LIVE_PUBLIC_BASE_URL
        );
    }

    #[test]
    fn test_jwks_url() {
        assert_eq!(
            config("project-test-abc").jwks_url(),
            "https://test.stytch.com/v1/public/project-test-abc/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_base_url_override() {
        let mut cfg = config("project-live-abc");
        cfg.public_base_url = Some("http://127.0.0.1:4000/".to_string());
        assert_eq!(
            cfg.endpoint_url("oauth2/token"),
            "http://127.0.0.1:4000/project-live-abc/oauth2/token"
        );
    }

    #[test]
    fn test_expected_issuer_and_audience() {
        let mut cfg = config("project-live-abc");
        assert_eq!(cfg.expected_issuer(), "stytch.com/project-live-abc");
        assert_eq!(cfg.expected_audience(), "project-live-abc");

        cfg.issuer = Some("https://issuer.example.com".to_string());
        assert_eq!(cfg.expected_issuer(), "https://issuer.example.com");
    }
}
