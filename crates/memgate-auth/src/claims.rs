//! Access token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Claims carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    pub iss: String,

    /// Subject (the end user).
    pub sub: String,

    /// Audiences. Accepts a single string or an array on the wire.
    #[serde(default, deserialize_with = "one_or_many")]
    pub aud: Vec<String>,

    /// Space-separated scopes granted to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// OAuth client the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Expiry, seconds since the epoch.
    pub exp: i64,

    /// Issued-at, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not-before, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Token id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Time left until expiry; negative once expired.
    pub fn time_until_expiration(&self) -> Option<chrono::Duration> {
        self.expires_at().map(|exp| exp - Utc::now())
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => vec![aud],
        OneOrMany::Many(aud) => aud,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_audience_accepts_string_or_array() {
        let single: Claims = serde_json::from_value(json!({
            "iss": "stytch.com/project-test-1",
            "sub": "user-1",
            "aud": "project-test-1",
            "exp": 4_102_444_800i64
        }))
        .unwrap();
        assert_eq!(single.aud, vec!["project-test-1"]);

        let many: Claims = serde_json::from_value(json!({
            "iss": "stytch.com/project-test-1",
            "sub": "user-1",
            "aud": ["project-test-1", "other"],
            "exp": 4_102_444_800i64,
            "client_id": "connected-app-1",
            "scope": "openid email"
        }))
        .unwrap();
        assert_eq!(many.aud.len(), 2);
        assert_eq!(many.client_id.as_deref(), Some("connected-app-1"));
        assert_eq!(many.scope.as_deref(), Some("openid email"));
    }

    #[test]
    fn test_expiry() {
        let mut claims: Claims = serde_json::from_value(json!({
            "iss": "i", "sub": "s", "aud": [], "exp": 0
        }))
        .unwrap();
        assert!(claims.time_until_expiration().unwrap() < chrono::Duration::zero());

        claims.exp = (Utc::now() + chrono::Duration::hours(1)).timestamp();
        assert!(claims.time_until_expiration().unwrap() > chrono::Duration::minutes(59));
    }
}
