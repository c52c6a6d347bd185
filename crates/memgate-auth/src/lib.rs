//! # memgate-auth
//!
//! Bearer token verification for the memgate gateway.
//!
//! This crate provides functionality for:
//! - Fetching and caching the identity provider's JSON Web Key Set
//! - Verifying RS256 access tokens (signature, issuer, audience, type, validity window)
//! - Carrying the verified token and its claims to tool handlers
//!
//! ## Request flow
//!
//! | Step | Type | Notes |
//! |------|------|-------|
//! | Parse `Authorization` header | [`bearer_token`] | `Bearer <token>` only |
//! | Resolve signing key | [`JwksCache`] | fetched once, refreshed on unknown `kid` |
//! | Verify token | [`TokenVerifier`] | RS256 allow-list, `typ` must be `JWT` |
//! | Hand off | [`CredentialContext`] | one per request, never shared |

pub mod claims;
pub mod context;
pub mod error;
pub mod keys;
pub mod token;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use claims::Claims;
pub use context::CredentialContext;
pub use error::AuthError;
pub use keys::JwksCache;
pub use token::{ALLOWED_ALGORITHM, TokenVerifier, bearer_token};
