//! Wiring of the gateway from its configuration.

use axum::Router;
use memgate_auth::{JwksCache, TokenVerifier};
use memgate_core::GatewayConfig;
use memgate_mcp::{HttpTransportState, McpServer, create_router};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "memgate.yaml";

/// Load the configuration file (if any), overlay the environment, validate.
///
/// An explicitly named file must exist. Without one, `memgate.yaml` is used
/// when present and defaults otherwise, so the gateway can be configured from
/// the environment alone.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GatewayConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
    };

    let mut config = match &path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading configuration");
            GatewayConfig::from_file(path)?
        }
        None => {
            tracing::info!("No configuration file, using defaults and environment");
            GatewayConfig::default()
        }
    };

    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// Build the full HTTP router.
pub fn build_router(config: &GatewayConfig) -> anyhow::Result<Router> {
    let keys = Arc::new(JwksCache::from_config(&config.identity)?);
    let verifier = Arc::new(TokenVerifier::from_config(&config.identity, Arc::clone(&keys)));
    let server = Arc::new(McpServer::new(config.mcp.clone(), config.backend.clone())?);

    if config.backend.base_url().is_none() {
        tracing::warn!("backend.api_url is not configured; every tool call will fail");
    }
    tracing::info!(
        project_id = %config.identity.project_id,
        issuer = %verifier.issuer(),
        audience = %verifier.audience(),
        jwks_url = %keys.url(),
        mcp_path = %config.mcp.path,
        tools = server.tools().len(),
        "Gateway configured"
    );

    let state = Arc::new(HttpTransportState::new(
        server,
        verifier,
        &config.identity,
        &config.mcp,
    ));
    Ok(create_router(state, &config.mcp.path))
}
