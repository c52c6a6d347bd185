//! # memgate-mcp
//!
//! MCP (Model Context Protocol) server for the memgate gateway.
//!
//! This crate exposes a memory/search backend as a small, fixed set of tools
//! for AI agents. It supports:
//!
//! - **Bearer authentication**: every tool call runs on behalf of a verified caller
//! - **Uniform responses**: every tool call returns a `Success!` or `Error:` text envelope
//! - **Identifier normalization**: `@web-42`, `web-42` and `web42` all mean web `42`
//! - **HTTP transport**: JSON-RPC over POST, plus OAuth discovery and health routes
//!
//! ## Architecture
//!
//! ```text
//! AI Agent (Claude, Cursor, etc.)
//!       │
//!       │ POST /mcp  Authorization: Bearer <token>
//!       ▼
//! ┌──────────────────────┐
//! │  memgate MCP server  │
//! │  1. Verify token     │  ← memgate-auth
//! │  2. Route JSON-RPC   │
//! │  3. Validate args    │
//! │  4. Normalize ids    │
//! │  5. Call backend     │  ← caller's own token
//! │  6. Wrap in envelope │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     Memory backend API
//! ```
//!
//! ## Tools
//!
//! | Tool | Arguments | Description |
//! |------|-----------|-------------|
//! | `FindWebs` | `query`, `scope?` | Search webs (collections of memories) |
//! | `FindMemories` | `query`, `scope?`, `webId?`, `sourceId?` | Semantic memory search |
//! | `AddMemory` | `client`, `content`, `webId?` | Store text or a conversation |

pub mod backend;
pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod http_transport;
pub mod inputs;
pub mod middleware;
pub mod normalize;
pub mod protocol;
pub mod server;
pub mod tools;

// Re-export main types
pub use backend::{AddMemoryResult, BackendClient, MemorySearchResults, WebSearchResults};
pub use catalog::ToolName;
pub use dispatcher::ToolDispatcher;
pub use error::McpError;
pub use http_transport::{HttpServer, HttpTransportState, create_router};
pub use normalize::{SOURCE_ID_PREFIXES, WEB_ID_PREFIXES, normalize_id};
pub use protocol::{
    CallToolParams, JsonRpcRequest, JsonRpcResponse, ToolAnnotations, ToolContent, ToolDefinition,
    ToolResponse,
};
pub use server::McpServer;
pub use tools::ToolRegistry;
