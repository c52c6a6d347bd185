//! Typed tool arguments.
//!
//! Every tool's arguments deserialize into one of these structs. Unknown
//! fields are rejected and scope values are restricted per tool.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scope of a web search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WebScope {
    /// Only the caller's own webs.
    #[serde(rename = "User.all")]
    UserAll,
    /// Public webs plus the caller's private ones.
    #[default]
    All,
}

impl WebScope {
    pub const VALUES: [&'static str; 2] = ["User.all", "All"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserAll => "User.all",
            Self::All => "All",
        }
    }
}

/// Scope of a memory search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemoryScope {
    /// Across all of the caller's webs.
    #[default]
    #[serde(rename = "User.all")]
    UserAll,
    /// Restricted to one web or one source.
    Web,
}

impl MemoryScope {
    pub const VALUES: [&'static str; 2] = ["User.all", "Web"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserAll => "User.all",
            Self::Web => "Web",
        }
    }
}

/// The agent application a memory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Client {
    Claude,
    ChatGPT,
    #[serde(rename = "Cascade - Windsurf")]
    CascadeWindsurf,
    Cursor,
    Cline,
    Warp,
    Other,
    Continue,
    #[serde(rename = "Roo-Cline")]
    RooCline,
    Encovo,
    #[serde(rename = "Highlight AI")]
    HighlightAi,
}

impl Client {
    pub const VALUES: [&'static str; 11] = [
        "Claude",
        "ChatGPT",
        "Cascade - Windsurf",
        "Cursor",
        "Cline",
        "Warp",
        "Other",
        "Continue",
        "Roo-Cline",
        "Encovo",
        "Highlight AI",
    ];
}

/// Author of a message: the end user or the agent application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    User,
    #[serde(untagged)]
    Client(Client),
}

/// One role-tagged message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    pub content: String,
    pub role: MessageRole,
}

/// Memory content: free text or an ordered conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Messages(Vec<Message>),
}

/// Arguments of `FindWebs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindWebsInput {
    pub query: String,
    #[serde(default)]
    pub scope: WebScope,
}

/// Arguments of `FindMemories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindMemoriesInput {
    pub query: String,
    #[serde(default)]
    pub scope: MemoryScope,
    #[serde(rename = "webId", default, skip_serializing_if = "Option::is_none")]
    pub web_id: Option<String>,
    #[serde(rename = "sourceId", default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

/// Arguments of `AddMemory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddMemoryInput {
    pub client: Client,
    pub content: Content,
    #[serde(rename = "webId", default, skip_serializing_if = "Option::is_none")]
    pub web_id: Option<String>,
}

/// Parse tool arguments, treating a missing argument object as empty.
pub fn parse_arguments<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, serde_json::Error> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_defaults() {
        let webs: FindWebsInput = parse_arguments(json!({"query": "alpha"})).unwrap();
        assert_eq!(webs.scope, WebScope::All);

        let memories: FindMemoriesInput = parse_arguments(json!({"query": "x"})).unwrap();
        assert_eq!(memories.scope, MemoryScope::UserAll);
    }

    #[test]
    fn test_scope_restricted_per_tool() {
        assert!(parse_arguments::<FindWebsInput>(json!({"query": "a", "scope": "Web"})).is_err());
        assert!(parse_arguments::<FindMemoriesInput>(json!({"query": "a", "scope": "All"})).is_err());
        let ok: FindMemoriesInput =
            parse_arguments(json!({"query": "a", "scope": "Web", "webId": "@web-7"})).unwrap();
        assert_eq!(ok.scope, MemoryScope::Web);
        assert_eq!(ok.web_id.as_deref(), Some("@web-7"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(parse_arguments::<FindWebsInput>(json!({"query": "a", "limit": 5})).is_err());
        assert!(parse_arguments::<FindWebsInput>(Value::Null).is_err());
    }

    #[test]
    fn test_content_forms() {
        let text: AddMemoryInput =
            parse_arguments(json!({"client": "Cascade - Windsurf", "content": "remember this"})).unwrap();
        assert_eq!(text.client, Client::CascadeWindsurf);
        assert_eq!(text.content, Content::Text("remember this".to_string()));

        let conversation: AddMemoryInput = parse_arguments(json!({
            "client": "Claude",
            "content": [
                {"role": "User", "content": "hi"},
                {"role": "Claude", "content": "hello"}
            ]
        }))
        .unwrap();
        let Content::Messages(messages) = &conversation.content else {
            panic!("expected messages");
        };
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Client(Client::Claude));

        // Round-trips unchanged to the wire.
        assert_eq!(
            serde_json::to_value(&conversation.content).unwrap(),
            json!([
                {"content": "hi", "role": "User"},
                {"content": "hello", "role": "Claude"}
            ])
        );
    }

    #[test]
    fn test_unknown_client_rejected() {
        assert!(parse_arguments::<AddMemoryInput>(json!({"client": "Emacs", "content": "x"})).is_err());
    }

    #[test]
    fn test_value_lists_match_serde_names() {
        for value in Client::VALUES {
            assert!(serde_json::from_value::<Client>(json!(value)).is_ok(), "{value}");
        }
        for value in WebScope::VALUES {
            assert_eq!(serde_json::from_value::<WebScope>(json!(value)).unwrap().as_str(), value);
        }
        for value in MemoryScope::VALUES {
            assert_eq!(serde_json::from_value::<MemoryScope>(json!(value)).unwrap().as_str(), value);
        }
    }
}
