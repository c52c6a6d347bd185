//! Tool registry for MCP tools.
//!
//! Holds the definitions served by `tools/list`. The definitions themselves
//! live in the `catalog` module.

use crate::catalog::ToolName;
use crate::protocol::ToolDefinition;
use std::collections::HashMap;

/// Registry of available MCP tools.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registry holding every tool in the catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for tool in ToolName::ALL {
            registry.register(tool.definition());
        }
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: ToolDefinition) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// List all tools, ordered by name.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_tool(name: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.to_string(),
            description: Some(format!("Test tool: {}", name)),
            input_schema: json!({"type": "object"}),
            annotations: None,
        }
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(create_test_tool("test"));
        registry.register(create_test_tool("test"));
        registry.register(create_test_tool("other"));

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["other", "test"]);
    }

    #[test]
    fn test_builtin_tools() {
        let registry = ToolRegistry::builtin();
        assert_eq!(registry.len(), 3);

        let names: Vec<_> = registry.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["AddMemory", "FindMemories", "FindWebs"]);
    }
}
