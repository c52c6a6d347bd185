//! Backend memory API client.
//!
//! One [`BackendClient`] is created per tool call from the shared HTTP client
//! and the caller's credentials. Every request carries the caller's bearer
//! token; there is no unauthenticated path.

use crate::error::McpError;
use crate::inputs::{Client, Content, MemoryScope, WebScope};
use memgate_core::BackendConfig;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Result of `GET /search/webs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResults {
    pub webs: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of `GET /search/memories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemorySearchResults(pub Vec<Value>);

/// Result of `POST /add/memory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddMemoryResult(pub Map<String, Value>);

/// Body of `POST /add/memory`.
#[derive(Debug, Serialize)]
struct AddMemoryRequest<'a> {
    client: Client,
    content: &'a Content,
    #[serde(rename = "webId", skip_serializing_if = "Option::is_none")]
    web_id: Option<&'a str>,
    #[serde(rename = "clientId", skip_serializing_if = "Option::is_none")]
    client_id: Option<&'a str>,
}

/// Build the shared HTTP client used for backend calls.
pub fn http_client(config: &BackendConfig) -> Result<reqwest::Client, McpError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| McpError::Internal(e.into()))
}

/// Authenticated client for one caller.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    client_id: Option<String>,
}

impl BackendClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(
        config: &BackendConfig,
        access_token: impl Into<String>,
        client_id: Option<String>,
    ) -> Result<Self, McpError> {
        Self::with_http(http_client(config)?, config, access_token, client_id)
    }

    /// Create a client on a shared HTTP connection pool.
    pub fn with_http(
        http: reqwest::Client,
        config: &BackendConfig,
        access_token: impl Into<String>,
        client_id: Option<String>,
    ) -> Result<Self, McpError> {
        let root = config.base_url().ok_or(McpError::MissingBaseUrl)?;
        let prefix = config.api_prefix.trim_end_matches('/');

        Ok(Self {
            http,
            base_url: format!("{root}{prefix}"),
            access_token: access_token.into(),
            client_id,
        })
    }

    /// `{api_url}{api_prefix}`, the root every endpoint path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search webs.
    pub async fn search_webs(&self, query: &str, scope: WebScope) -> Result<WebSearchResults, McpError> {
        let params = [("query", query), ("scope", scope.as_str())];
        let value = self.request(Method::GET, "/search/webs", &params, None).await?;
        typed(value)
    }

    /// Search memories, optionally within one web or source.
    pub async fn search_memories(
        &self,
        query: &str,
        scope: MemoryScope,
        web_id: Option<&str>,
        source_id: Option<&str>,
    ) -> Result<MemorySearchResults, McpError> {
        let mut params = vec![("query", query), ("scope", scope.as_str())];
        if let Some(web_id) = web_id {
            params.push(("webId", web_id));
        }
        if let Some(source_id) = source_id {
            params.push(("sourceId", source_id));
        }
        if let Some(client_id) = self.client_id.as_deref() {
            params.push(("clientId", client_id));
        }

        let value = self.request(Method::GET, "/search/memories", &params, None).await?;
        typed(value)
    }

    /// Store a memory.
    pub async fn add_memory(
        &self,
        client: Client,
        content: &Content,
        web_id: Option<&str>,
    ) -> Result<AddMemoryResult, McpError> {
        let body = serde_json::to_value(AddMemoryRequest {
            client,
            content,
            web_id,
            client_id: self.client_id.as_deref(),
        })?;

        let value = self.request(Method::POST, "/add/memory", &[], Some(&body)).await?;
        typed(value)
    }

    /// Issue one authenticated request and return the JSON body.
    ///
    /// Non-2xx responses fail with their status and body text. No retries.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, McpError> {
        if self.access_token.trim().is_empty() {
            tracing::error!(path, "Access token is missing for backend call");
            return Err(McpError::MissingCredentials);
        }

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "Calling backend");

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.access_token);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            // Sets `Content-Type: application/json`.
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "Backend unreachable");
            McpError::BackendUnavailable(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Failed to read backend response");
            McpError::BackendUnavailable(e.to_string())
        })?;

        if !status.is_success() {
            tracing::warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                body = %text,
                "Backend call failed"
            );
            return Err(McpError::BackendRequest {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| McpError::UnexpectedPayload(format!("response is not JSON: {e}")))
    }
}

fn typed<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value).map_err(|e| McpError::UnexpectedPayload(e.to_string()))
}
