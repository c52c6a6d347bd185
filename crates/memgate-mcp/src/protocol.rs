//! MCP protocol types.
//!
//! This module defines the JSON-RPC message types used by MCP and the text
//! envelope every tool call returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// JSON-RPC request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a request with the given method and params.
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }

    /// Notifications carry no id and expect no response body.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP server info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// MCP tool definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

/// Behavioural hints for clients.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolAnnotations {
    #[serde(rename = "readOnlyHint", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "idempotentHint", skip_serializing_if = "Option::is_none")]
    pub idempotent: Option<bool>,
    #[serde(rename = "openWorldHint", skip_serializing_if = "Option::is_none")]
    pub open_world: Option<bool>,
}

/// List tools response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResponse {
    pub tools: Vec<ToolDefinition>,
}

/// Call tool request parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Tool response content. Only text blocks are ever produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

/// The envelope returned by every tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ToolContent>,
}

impl ToolResponse {
    /// Marker that starts every success text.
    pub const SUCCESS_MARKER: &'static str = "Success!";

    /// Marker that starts every error text.
    pub const ERROR_MARKER: &'static str = "Error:";

    /// Success envelope: a fixed description plus the pretty-printed payload.
    pub fn success(description: &str, returned: &Value) -> Self {
        let pretty = serde_json::to_string_pretty(returned).unwrap_or_else(|_| returned.to_string());
        Self::text(format!(
            "{} {description}\n\nReturned:\n{pretty}",
            Self::SUCCESS_MARKER
        ))
    }

    /// Error envelope: a fixed message plus optional pretty-printed details.
    pub fn error(error: &str, details: Option<&Value>) -> Self {
        let details = details
            .map(|d| serde_json::to_string_pretty(d).unwrap_or_else(|_| d.to_string()))
            .unwrap_or_default();
        Self::text(format!("{} {error}\n\n{details}", Self::ERROR_MARKER))
    }

    fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
        }
    }

    /// The text of the first content block.
    pub fn text_content(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }

    /// Whether this is an error envelope.
    pub fn is_error(&self) -> bool {
        self.text_content().starts_with(Self::ERROR_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_text() {
        let response = ToolResponse::success("Successfully found matching webs.", &json!({"webs": []}));
        assert_eq!(
            response.text_content(),
            "Success! Successfully found matching webs.\n\nReturned:\n{\n  \"webs\": []\n}"
        );
        assert!(!response.is_error());
    }

    #[test]
    fn test_error_envelope_text() {
        let with_details = ToolResponse::error("Could not find any webs.", Some(&json!({"message": "boom"})));
        assert_eq!(
            with_details.text_content(),
            "Error: Could not find any webs.\n\n{\n  \"message\": \"boom\"\n}"
        );
        assert!(with_details.is_error());

        let bare = ToolResponse::error("Could not find any webs.", None);
        assert_eq!(bare.text_content(), "Error: Could not find any webs.\n\n");
    }

    #[test]
    fn test_envelope_wire_shape() {
        let response = ToolResponse::error("x", None);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"content": [{"type": "text", "text": "Error: x\n\n"}]})
        );
    }
}
