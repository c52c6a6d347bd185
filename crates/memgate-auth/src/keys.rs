//! Remote key set cache.
//!
//! The identity provider publishes its signing keys as a JSON Web Key Set.
//! The set is fetched lazily on first use and kept for the life of the
//! process. When a token names a key id the cached set does not contain,
//! callers ask for a refresh; refreshes for that reason are limited to one
//! per cooldown window so that tokens with made-up key ids cannot drive
//! traffic to the provider. Two requests racing on a cold cache may both
//! fetch; the last write wins and both results are identical key material.

use crate::error::AuthError;
use jsonwebtoken::jwk::JwkSet;
use memgate_core::IdentityConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Minimum time between two key set fetches triggered by an unknown key id.
pub const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

/// Process-wide cache of the provider's public keys.
pub struct JwksCache {
    url: String,
    http: reqwest::Client,
    keys: RwLock<Option<Arc<JwkSet>>>,
    refresh_cooldown: Duration,
    last_fetch: Mutex<Option<Instant>>,
}

impl JwksCache {
    /// Create an empty cache for the key set published at `url`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Internal(e.into()))?;

        Ok(Self {
            url: url.into(),
            http,
            keys: RwLock::new(None),
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
            last_fetch: Mutex::new(None),
        })
    }

    /// Create a cache for the key set of the configured project.
    pub fn from_config(config: &IdentityConfig) -> Result<Self, AuthError> {
        Ok(Self::new(
            config.jwks_url(),
            Duration::from_secs(config.jwks_timeout_secs),
        )?
        .with_refresh_cooldown(Duration::from_secs(config.jwks_refresh_cooldown_secs)))
    }

    /// Set the minimum time between fetches in [`refresh_if_stale`](Self::refresh_if_stale).
    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    /// The key set URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a key set has been fetched.
    pub async fn is_populated(&self) -> bool {
        self.keys.read().await.is_some()
    }

    /// Return the cached key set, fetching it on first use.
    pub async fn get(&self) -> Result<Arc<JwkSet>, AuthError> {
        if let Some(keys) = self.keys.read().await.as_ref() {
            return Ok(Arc::clone(keys));
        }
        tracing::info!(url = %self.url, "Initializing key set");
        self.refresh().await
    }

    /// Fetch the key set unconditionally and replace the cached copy.
    ///
    /// On failure the previously cached set, if any, is kept.
    pub async fn refresh(&self) -> Result<Arc<JwkSet>, AuthError> {
        *self.last_fetch.lock().await = Some(Instant::now());
        self.fetch_and_store().await
    }

    /// Refetch the key set unless the last fetch was within the cooldown.
    ///
    /// Returns `None` without any network traffic while cooling down. A failed
    /// fetch still starts a new cooldown window.
    pub async fn refresh_if_stale(&self) -> Result<Option<Arc<JwkSet>>, AuthError> {
        {
            let mut last_fetch = self.last_fetch.lock().await;
            if let Some(at) = *last_fetch {
                if at.elapsed() < self.refresh_cooldown {
                    return Ok(None);
                }
            }
            *last_fetch = Some(Instant::now());
        }
        self.fetch_and_store().await.map(Some)
    }

    async fn fetch_and_store(&self) -> Result<Arc<JwkSet>, AuthError> {
        let fetched = Arc::new(self.fetch().await?);
        *self.keys.write().await = Some(Arc::clone(&fetched));

        tracing::debug!(
            url = %self.url,
            key_count = fetched.keys.len(),
            "Key set cached"
        );
        Ok(fetched)
    }

    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::warn!(url = %self.url, error = %e, "Key set fetch failed");
            AuthError::KeySetUnavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.url, status = status.as_u16(), "Key set endpoint returned an error");
            return Err(AuthError::KeySetUnavailable(format!(
                "key set endpoint returned {status}"
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(format!("malformed key set: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JWKS_PATH: &str = "/project-test-1/.well-known/jwks.json";

    async fn cache_for(server: &MockServer) -> JwksCache {
        JwksCache::new(
            format!("{}{}", server.uri(), JWKS_PATH),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetches_once_and_reuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(testing::jwks_json(&[testing::KEY_ID])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cache = cache_for(&server).await;
        assert!(!cache.is_populated().await);

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();

        assert!(cache.is_populated().await);
        assert!(first.find(testing::KEY_ID).is_some());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_refresh_refetches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(testing::jwks_json(&[testing::KEY_ID])),
            )
            .expect(2)
            .mount(&server)
            .await;

        let cache = cache_for(&server).await;
        cache.get().await.unwrap();
        cache.refresh().await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let cache = cache_for(&server).await;
        let err = cache.get().await.unwrap_err();
        assert!(matches!(err, AuthError::KeySetUnavailable(_)));
        assert!(!cache.is_populated().await);
    }

    #[tokio::test]
    async fn test_malformed_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let cache = cache_for(&server).await;
        assert!(matches!(
            cache.get().await,
            Err(AuthError::KeySetUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_if_stale_respects_cooldown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(testing::jwks_json(&[testing::KEY_ID])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let cache = cache_for(&server).await;
        cache.get().await.unwrap();

        for _ in 0..5 {
            assert!(cache.refresh_if_stale().await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_refresh_if_stale_after_cooldown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(testing::jwks_json(&[testing::KEY_ID])),
            )
            .expect(2)
            .mount(&server)
            .await;

        let cache = cache_for(&server)
            .await
            .with_refresh_cooldown(Duration::from_millis(50));
        cache.get().await.unwrap();
        assert!(cache.refresh_if_stale().await.unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(80)).await;
        let refreshed = cache.refresh_if_stale().await.unwrap();
        assert!(refreshed.is_some_and(|keys| keys.find(testing::KEY_ID).is_some()));
    }
}
