//! Tool dispatch.
//!
//! The dispatcher is the error containment point of the gateway: whatever goes
//! wrong inside a tool call comes back as an error envelope, never as an
//! `Err` or a JSON-RPC error.

use crate::backend::{self, BackendClient};
use crate::catalog::ToolName;
use crate::error::McpError;
use crate::inputs::{AddMemoryInput, FindMemoriesInput, FindWebsInput, MemoryScope, parse_arguments};
use crate::normalize::{SOURCE_ID_PREFIXES, WEB_ID_PREFIXES, normalize_optional_id};
use crate::protocol::ToolResponse;
use memgate_auth::CredentialContext;
use memgate_core::BackendConfig;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

const UNKNOWN_TOOL: &str = "Unknown tool.";

/// Fixed envelope texts of one tool.
struct Outcome {
    success: &'static str,
    failure: &'static str,
}

fn outcome(tool: ToolName) -> Outcome {
    match tool {
        ToolName::FindWebs => Outcome {
            success: "Successfully found matching webs.",
            failure: "Could not find any webs.",
        },
        ToolName::FindMemories => Outcome {
            success: "Memory search completed successfully.",
            failure: "Could not search memories.",
        },
        ToolName::AddMemory => Outcome {
            success: "Memory added successfully.",
            failure: "Could not add memory.",
        },
    }
}

/// Runs tool calls against the backend on behalf of one caller at a time.
///
/// Holds no per-caller state; credentials arrive with each call.
pub struct ToolDispatcher {
    config: BackendConfig,
    http: reqwest::Client,
}

impl ToolDispatcher {
    /// Create a dispatcher with a shared HTTP client for `config`.
    pub fn new(config: BackendConfig) -> Result<Self, McpError> {
        let http = backend::http_client(&config)?;
        Ok(Self { config, http })
    }

    /// Run a tool call. Always returns an envelope.
    pub async fn call(
        &self,
        name: &str,
        arguments: Value,
        credentials: Option<&CredentialContext>,
    ) -> ToolResponse {
        let Some(tool) = ToolName::parse(name) else {
            tracing::warn!(tool = name, "Unknown tool called");
            let err = McpError::ToolNotFound {
                name: name.to_string(),
            };
            return ToolResponse::error(UNKNOWN_TOOL, Some(&error_details(&err)));
        };

        tracing::info!(
            tool = tool.as_str(),
            sub = credentials.map(CredentialContext::subject),
            "Tool called"
        );

        let outcome = outcome(tool);
        let result = match tool {
            ToolName::FindWebs => self.find_webs(arguments, credentials).await,
            ToolName::FindMemories => self.find_memories(arguments, credentials).await,
            ToolName::AddMemory => self.add_memory(arguments, credentials).await,
        };

        match result {
            Ok(returned) => ToolResponse::success(outcome.success, &returned),
            Err(err) => {
                if err.is_configuration() {
                    tracing::error!(tool = tool.as_str(), error = %err, "Tool call misconfigured");
                } else {
                    tracing::warn!(
                        tool = tool.as_str(),
                        status = err.backend_status(),
                        error = %err,
                        "Tool call failed"
                    );
                }
                ToolResponse::error(outcome.failure, Some(&error_details(&err)))
            }
        }
    }

    async fn find_webs(
        &self,
        arguments: Value,
        credentials: Option<&CredentialContext>,
    ) -> Result<Value, McpError> {
        let input: FindWebsInput = arguments_for(ToolName::FindWebs, arguments)?;
        let backend = self.backend(credentials)?;

        let results = backend.search_webs(&input.query, input.scope).await?;
        tracing::debug!(count = results.webs.len(), "Webs found");
        Ok(serde_json::to_value(results)?)
    }

    async fn find_memories(
        &self,
        arguments: Value,
        credentials: Option<&CredentialContext>,
    ) -> Result<Value, McpError> {
        let input: FindMemoriesInput = arguments_for(ToolName::FindMemories, arguments)?;
        let web_id = normalize_optional_id(input.web_id.as_deref(), WEB_ID_PREFIXES);
        let source_id = normalize_optional_id(input.source_id.as_deref(), SOURCE_ID_PREFIXES);

        if input.scope == MemoryScope::Web && web_id.is_none() && source_id.is_none() {
            return Err(McpError::InvalidArguments {
                tool: ToolName::FindMemories.as_str().to_string(),
                reason: "scope 'Web' requires a webId or sourceId".to_string(),
            });
        }

        let backend = self.backend(credentials)?;
        let results = backend
            .search_memories(&input.query, input.scope, web_id.as_deref(), source_id.as_deref())
            .await?;
        tracing::debug!(count = results.0.len(), "Memory search completed");
        Ok(serde_json::to_value(results)?)
    }

    async fn add_memory(
        &self,
        arguments: Value,
        credentials: Option<&CredentialContext>,
    ) -> Result<Value, McpError> {
        let input: AddMemoryInput = arguments_for(ToolName::AddMemory, arguments)?;
        let web_id = normalize_optional_id(input.web_id.as_deref(), WEB_ID_PREFIXES);

        let backend = self.backend(credentials)?;
        let result = backend
            .add_memory(input.client, &input.content, web_id.as_deref())
            .await?;
        Ok(serde_json::to_value(result)?)
    }

    /// Backend client bound to the caller's token.
    fn backend(&self, credentials: Option<&CredentialContext>) -> Result<BackendClient, McpError> {
        let credentials = credentials.ok_or(McpError::AccessTokenUnavailable)?;
        BackendClient::with_http(
            self.http.clone(),
            &self.config,
            credentials.access_token(),
            credentials.client_id().map(str::to_string),
        )
    }
}

fn arguments_for<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> Result<T, McpError> {
    parse_arguments(arguments).map_err(|e| McpError::InvalidArguments {
        tool: tool.as_str().to_string(),
        reason: e.to_string(),
    })
}

/// Details attached to an error envelope.
fn error_details(err: &McpError) -> Value {
    match err {
        McpError::BackendRequest { status, body } => json!({
            "message": err.to_string(),
            "status": status,
            "body": body,
        }),
        _ => json!({ "message": err.to_string() }),
    }
}
