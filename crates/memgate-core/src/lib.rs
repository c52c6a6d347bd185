//! # memgate-core
//!
//! Configuration types shared across the memgate crates.

pub mod config;

pub use config::{BackendConfig, ConfigError, GatewayConfig, IdentityConfig, McpConfig};
