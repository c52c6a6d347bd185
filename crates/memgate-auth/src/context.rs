//! Per-request credential context.

use crate::claims::Claims;
use std::fmt;

/// The verified caller of a single request.
///
/// Created by the HTTP layer after a token verifies and handed to tool
/// handlers explicitly. Each request owns its own context; it is never stored
/// in shared state, so concurrent requests cannot observe each other's tokens.
#[derive(Clone)]
pub struct CredentialContext {
    access_token: String,
    claims: Claims,
}

impl CredentialContext {
    /// Bind a verified token to its claims.
    pub fn new(access_token: impl Into<String>, claims: Claims) -> Self {
        Self {
            access_token: access_token.into(),
            claims,
        }
    }

    /// The raw bearer token, forwarded unchanged to the backend.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The verified claims.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// The token subject.
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    /// The OAuth client the token was issued to, if present and non-empty.
    pub fn client_id(&self) -> Option<&str> {
        self.claims
            .client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialContext")
            .field("access_token", &"<redacted>")
            .field("sub", &self.claims.sub)
            .field("client_id", &self.client_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn test_client_id_from_claims() {
        let mut claims = testing::claims("project-test-1", "user-1");
        let ctx = CredentialContext::new("tok", claims.clone());
        assert_eq!(ctx.access_token(), "tok");
        assert_eq!(ctx.subject(), "user-1");
        assert_eq!(ctx.client_id(), Some("connected-app-test-1"));

        claims.client_id = Some("  ".to_string());
        assert_eq!(CredentialContext::new("tok", claims.clone()).client_id(), None);

        claims.client_id = None;
        assert_eq!(CredentialContext::new("tok", claims).client_id(), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let ctx = CredentialContext::new(
            "secret-token-value",
            testing::claims("project-test-1", "user-1"),
        );
        let debug = format!("{ctx:?}");
        assert!(!debug.contains("secret-token-value"));
        assert!(debug.contains("user-1"));
    }
}
