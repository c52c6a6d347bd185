//! Access token verification.

use crate::claims::Claims;
use crate::error::AuthError;
use crate::keys::JwksCache;
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, decode, decode_header};
use memgate_core::IdentityConfig;
use std::sync::Arc;

/// The single signing algorithm accepted on access tokens.
pub const ALLOWED_ALGORITHM: Algorithm = Algorithm::RS256;

/// The `typ` header value accepted on access tokens.
const EXPECTED_TOKEN_TYPE: &str = "JWT";

/// Extract the token from an `Authorization` header value.
///
/// Only the exact `Bearer ` scheme prefix is accepted.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Verifies access tokens against the provider's published keys.
pub struct TokenVerifier {
    keys: Arc<JwksCache>,
    issuer: String,
    audience: String,
    leeway_secs: u64,
}

impl TokenVerifier {
    /// Create a verifier accepting exactly one issuer and one audience.
    pub fn new(keys: Arc<JwksCache>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_secs: 0,
        }
    }

    /// Create a verifier for the configured project.
    pub fn from_config(config: &IdentityConfig, keys: Arc<JwksCache>) -> Self {
        Self::new(keys, config.expected_issuer(), config.expected_audience())
            .with_leeway(config.leeway_secs)
    }

    /// Set the clock skew tolerated on `exp` and `nbf`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    /// The expected issuer.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// The expected audience.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify a token and return its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::InvalidToken(format!("malformed token: {e}")))?;
        check_header(&header)?;

        let key = self.decoding_key(header.kid.as_deref()).await?;
        let data = decode::<Claims>(token, &key, &self.validation())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        tracing::debug!(
            sub = %data.claims.sub,
            client_id = ?data.claims.client_id,
            exp = data.claims.exp,
            "Token verified"
        );
        Ok(data.claims)
    }

    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
        let keys = self.keys.get().await?;
        let jwk = match kid {
            Some(kid) => match keys.find(kid) {
                Some(jwk) => jwk.clone(),
                None => {
                    // Unknown kid: the provider may have rotated keys.
                    let unknown = || AuthError::InvalidToken(format!("unknown key id: {kid}"));
                    match self.keys.refresh_if_stale().await? {
                        Some(keys) => {
                            tracing::info!(kid, "Key id not in cached key set, refreshed");
                            keys.find(kid).cloned().ok_or_else(unknown)?
                        }
                        None => {
                            tracing::debug!(kid, "Key id not in cached key set, refresh cooling down");
                            return Err(unknown());
                        }
                    }
                }
            },
            None => keys
                .keys
                .first()
                .cloned()
                .ok_or_else(|| AuthError::KeySetUnavailable("key set is empty".to_string()))?,
        };

        DecodingKey::from_jwk(&jwk)
            .map_err(|e| AuthError::InvalidToken(format!("unusable signing key: {e}")))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALLOWED_ALGORITHM);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = self.leeway_secs;
        validation
    }
}

fn check_header(header: &Header) -> Result<(), AuthError> {
    let typ_ok = header.typ.as_deref().is_some_and(|typ| {
        typ.eq_ignore_ascii_case(EXPECTED_TOKEN_TYPE) || typ.eq_ignore_ascii_case("application/jwt")
    });
    if !typ_ok {
        return Err(AuthError::InvalidToken(format!(
            "unexpected token type: {:?}",
            header.typ
        )));
    }

    if header.alg != ALLOWED_ALGORITHM {
        return Err(AuthError::InvalidToken(format!(
            "algorithm {:?} is not allowed",
            header.alg
        )));
    }
    Ok(())
}
