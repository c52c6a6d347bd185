//! MCP server implementation.
//!
//! This module routes JSON-RPC methods. It is immutable after construction and
//! shared across requests; the caller's credentials are passed into every
//! request explicitly.

use crate::dispatcher::ToolDispatcher;
use crate::error::McpError;
use crate::protocol::*;
use crate::tools::ToolRegistry;
use memgate_auth::CredentialContext;
use memgate_core::config::{BackendConfig, McpConfig};
use serde_json::{Value, json};

/// The MCP server.
pub struct McpServer {
    config: McpConfig,
    tools: ToolRegistry,
    dispatcher: ToolDispatcher,
}

impl McpServer {
    /// Create a server exposing the built-in tools against `backend`.
    pub fn new(config: McpConfig, backend: BackendConfig) -> Result<Self, McpError> {
        Ok(Self::with_dispatcher(config, ToolDispatcher::new(backend)?))
    }

    /// Create a server around an existing dispatcher.
    pub fn with_dispatcher(config: McpConfig, dispatcher: ToolDispatcher) -> Self {
        Self {
            config,
            tools: ToolRegistry::builtin(),
            dispatcher,
        }
    }

    /// The registered tools.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle a JSON-RPC request on behalf of `credentials`.
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        credentials: Option<&CredentialContext>,
    ) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => JsonRpcResponse::success(id, json!({})),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params, credentials).await,
            "shutdown" => self.handle_shutdown(id),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": ServerInfo {
                name: self.config.server_name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: self.tools.list().into_iter().cloned().collect(),
        };
        match serde_json::to_value(result) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    async fn handle_call_tool(
        &self,
        id: Option<Value>,
        params: Option<Value>,
        credentials: Option<&CredentialContext>,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
            None => return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params"),
        };

        let response = self
            .dispatcher
            .call(&params.name, params.arguments, credentials)
            .await;

        match serde_json::to_value(response) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP shutdown requested");
        JsonRpcResponse::success(id, json!(null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::new(McpConfig::default(), BackendConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let request = JsonRpcRequest::new(1, "initialize", None);

        let response = server().handle_request(request, None).await;
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "memgate");
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_list_tools() {
        let request = JsonRpcRequest::new(1, "tools/list", None);

        let response = server().handle_request(request, None).await;
        let tools = response.result.unwrap()["tools"].as_array().cloned().unwrap();
        assert_eq!(tools.len(), 3);
        assert!(tools.iter().all(|t| t.get("inputSchema").is_some()));
    }

    #[tokio::test]
    async fn test_call_without_credentials_is_error_envelope() {
        let request = JsonRpcRequest::new(
            1,
            "tools/call",
            Some(json!({ "name": "FindWebs", "arguments": { "query": "alpha" } })),
        );

        let response = server().handle_request(request, None).await;
        assert!(response.error.is_none());
        let text = response.result.unwrap()["content"][0]["text"].as_str().unwrap().to_string();
        assert!(text.starts_with("Error: Could not find any webs."));
    }

    #[tokio::test]
    async fn test_call_without_params() {
        let request = JsonRpcRequest::new(1, "tools/call", None);

        let response = server().handle_request(request, None).await;
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let request = JsonRpcRequest::new(7, "resources/list", None);

        let response = server().handle_request(request, None).await;
        assert_eq!(response.id, Some(json!(7)));
        assert_eq!(response.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
    }
}
