//! Error types for the auth crate.

use thiserror::Error;

/// Errors that can occur while authenticating a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header.
    #[error("missing or invalid access token")]
    MissingToken,

    /// The token failed verification.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The key set could not be fetched or parsed.
    #[error("key set unavailable: {0}")]
    KeySetUnavailable(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
