//! Error types for the MCP crate.

use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// A tool ran without a verified credential context.
    #[error("Access token not available for memory service.")]
    AccessTokenUnavailable,

    /// No backend API URL is configured.
    #[error("API_URL is not configured.")]
    MissingBaseUrl,

    /// The backend client was handed an empty token.
    #[error("Authentication token is missing for API call.")]
    MissingCredentials,

    /// The backend answered with a non-2xx status.
    #[error("{status}: {body}")]
    BackendRequest { status: u16, body: String },

    /// The backend could not be reached.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered 2xx with a payload of the wrong shape.
    #[error("unexpected backend payload: {0}")]
    UnexpectedPayload(String),

    /// Tool not found.
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Invalid arguments for tool.
    #[error("invalid arguments for tool {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl McpError {
    /// Whether this error points at a deployment or wiring defect rather than
    /// a bad request.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::AccessTokenUnavailable | Self::MissingBaseUrl | Self::MissingCredentials
        )
    }

    /// HTTP status of a backend rejection, if this is one.
    pub fn backend_status(&self) -> Option<u16> {
        match self {
            Self::BackendRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_request_message() {
        let err = McpError::BackendRequest {
            status: 500,
            body: "internal".to_string(),
        };
        assert_eq!(err.to_string(), "500: internal");
        assert_eq!(err.backend_status(), Some(500));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_configuration_errors() {
        assert!(McpError::AccessTokenUnavailable.is_configuration());
        assert!(McpError::MissingBaseUrl.is_configuration());
        assert!(McpError::MissingCredentials.is_configuration());
        assert!(!McpError::BackendUnavailable("timeout".into()).is_configuration());
    }
}
