//! MCP endpoint configuration.
//!
//! This module defines where the gateway listens and how the HTTP surface
//! around the MCP endpoint behaves.

use serde::{Deserialize, Serialize};

/// Configuration for the MCP HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// HTTP host to bind.
    #[serde(default = "default_http_host")]
    pub host: String,

    /// HTTP port to bind.
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Path of the bearer-protected JSON-RPC endpoint.
    #[serde(default = "default_path")]
    pub path: String,

    /// Where `GET /` redirects to. No redirect route when unset.
    #[serde(default)]
    pub landing_url: Option<String>,

    /// Server name reported by `initialize`.
    #[serde(default = "default_server_name")]
    pub server_name: String,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
            path: default_path(),
            landing_url: None,
            server_name: default_server_name(),
        }
    }
}

impl McpConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8787
}

fn default_path() -> String {
    "/mcp".to_string()
}

fn default_server_name() -> String {
    "memgate".to_string()
}
