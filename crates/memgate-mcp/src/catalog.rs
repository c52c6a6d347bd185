//! The fixed tool catalog.
//!
//! Names, descriptions, enums and defaults here are read by calling agents and
//! must stay stable.
//!
//! | Tool | Backend call | Default scope |
//! |------|--------------|---------------|
//! | `FindWebs` | `GET /search/webs` | `All` |
//! | `FindMemories` | `GET /search/memories` | `User.all` |
//! | `AddMemory` | `POST /add/memory` | n/a |

use crate::inputs::{Client, MemoryScope, WebScope};
use crate::protocol::{ToolAnnotations, ToolDefinition};
use serde_json::json;

/// The tools exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    FindWebs,
    FindMemories,
    AddMemory,
}

impl ToolName {
    pub const ALL: [ToolName; 3] = [Self::FindWebs, Self::FindMemories, Self::AddMemory];

    /// The advertised name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FindWebs => "FindWebs",
            Self::FindMemories => "FindMemories",
            Self::AddMemory => "AddMemory",
        }
    }

    /// Resolve a called name. `SearchWebs` and `SearchMemories` are accepted
    /// as aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "FindWebs" | "SearchWebs" => Some(Self::FindWebs),
            "FindMemories" | "SearchMemories" => Some(Self::FindMemories),
            "AddMemory" => Some(Self::AddMemory),
            _ => None,
        }
    }

    /// Full definition for `tools/list`.
    pub fn definition(self) -> ToolDefinition {
        match self {
            Self::FindWebs => find_webs(),
            Self::FindMemories => find_memories(),
            Self::AddMemory => add_memory(),
        }
    }
}

fn read_only() -> Option<ToolAnnotations> {
    Some(ToolAnnotations {
        read_only: Some(true),
        idempotent: Some(true),
        open_world: Some(true),
    })
}

fn find_webs() -> ToolDefinition {
    ToolDefinition {
        name: ToolName::FindWebs.as_str().to_string(),
        description: Some(
            "Search for Webs (collections of related memories). Use this only if the user \
             explicitly asks to search for webs, or if you need to narrow the memory search \
             scope by webId."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query for finding relevant webs."
                },
                "scope": {
                    "type": "string",
                    "enum": WebScope::VALUES,
                    "default": WebScope::default().as_str(),
                    "description": "\"User.all\" searches only the user's own webs. \"All\" includes both public webs and the user's private ones. You should only use User.all if the user asks to search within their own webs."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
        annotations: read_only(),
    }
}

fn find_memories() -> ToolDefinition {
    ToolDefinition {
        name: ToolName::FindMemories.as_str().to_string(),
        description: Some(
            "Search for memories using a semantic query. Optionally, limit the search to a \
             specific web or memory. You can also call this tool multiple times (when \
             instructed or to improve context quality) to orchestrate fine-grained context \
             for responses."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The semantic query used to search within the user's memories."
                },
                "scope": {
                    "type": "string",
                    "enum": MemoryScope::VALUES,
                    "default": MemoryScope::default().as_str(),
                    "description": "\"User.all\" searches across all of the user's webs. \"Web\" restricts the search to a specific web (webId or sourceId required)."
                },
                "webId": {
                    "type": "string",
                    "description": "The ID of the web to search within. Required if scope is 'Web' and a sourceId is not provided. If a user ever says to refer to a specific web, you should always use the webId provided by the user."
                },
                "sourceId": {
                    "type": "string",
                    "description": "Optional. The ID of a specific memory (source) to search within. Only use if the user clearly refers to a specific memory and make sure to set the scope to 'Web'. If a user ever says to refer to a specific memory, you should always use the sourceId provided by the user."
                }
            },
            "required": ["query"],
            "additionalProperties": false
        }),
        annotations: read_only(),
    }
}

fn add_memory() -> ToolDefinition {
    let role_values: Vec<&str> = std::iter::once("User").chain(Client::VALUES).collect();

    ToolDefinition {
        name: ToolName::AddMemory.as_str().to_string(),
        description: Some(
            "Save a memory for the user. Content is either free text or the conversation as \
             an ordered list of role-tagged messages. Only use this when the user asks to \
             remember something."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "client": {
                    "type": "string",
                    "enum": Client::VALUES,
                    "description": "The application you are running in."
                },
                "content": {
                    "description": "The text to remember, or the conversation messages in order.",
                    "anyOf": [
                        { "type": "string" },
                        {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "content": { "type": "string" },
                                    "role": { "type": "string", "enum": role_values }
                                },
                                "required": ["content", "role"],
                                "additionalProperties": false
                            }
                        }
                    ]
                },
                "webId": {
                    "type": "string",
                    "description": "Optional. The ID of the web to add the memory to."
                }
            },
            "required": ["client", "content"],
            "additionalProperties": false
        }),
        annotations: Some(ToolAnnotations {
            read_only: Some(false),
            idempotent: Some(false),
            open_world: Some(true),
        }),
    }
}
