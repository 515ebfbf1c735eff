use crate::tools::types::{ToolContext, ToolDefinition, ToolGroup, ToolResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition for the model API
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool with the given parameters
    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult;

    /// Returns the tool's name
    fn name(&self) -> String {
        self.definition().name.clone()
    }

    /// Returns the tool's group
    fn group(&self) -> ToolGroup {
        self.definition().group
    }
}

/// Registry that holds all available tools.
/// Interior mutability (RwLock) so registration takes `&self` and the
/// registry can live behind an `Arc` in app state.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a tool (thread-safe, takes &self via interior mutability)
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name.clone();
        self.tools.write().insert(name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// Definitions for a named subset, preserving the requested order.
    /// Unknown names are skipped with a warning rather than failing the run.
    pub fn definitions_for(&self, names: &[String]) -> Vec<ToolDefinition> {
        let tools = self.tools.read();
        names
            .iter()
            .filter_map(|name| match tools.get(name) {
                Some(tool) => Some(tool.definition()),
                None => {
                    log::warn!("[REGISTRY] Tool '{}' not found in registry", name);
                    None
                }
            })
            .collect()
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, params: Value, context: &ToolContext) -> ToolResult {
        let tool = match self.get(name) {
            Some(t) => t,
            None => return ToolResult::error(format!("Tool '{}' not found", name)),
        };
        tool.execute(params, context).await
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.read().contains_key(name)
    }

    /// Get count of registered tools
    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::types::ToolInputSchema;

    struct MockTool {
        definition: ToolDefinition,
    }

    impl MockTool {
        fn new(name: &str, group: ToolGroup) -> Self {
            MockTool {
                definition: ToolDefinition {
                    name: name.to_string(),
                    description: format!("Mock {} tool", name),
                    input_schema: ToolInputSchema::default(),
                    group,
                },
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> ToolDefinition {
            self.definition.clone()
        }

        async fn execute(&self, _params: Value, _context: &ToolContext) -> ToolResult {
            ToolResult::success("mock result")
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("web_search", ToolGroup::Web)));

        assert!(registry.has_tool("web_search"));
        assert!(!registry.has_tool("nonexistent"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_definitions_for_preserves_order_and_skips_unknown() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("stock_price", ToolGroup::Finance)));
        registry.register(Arc::new(MockTool::new("company_info", ToolGroup::Finance)));

        let defs = registry.definitions_for(&[
            "company_info".to_string(),
            "no_such_tool".to_string(),
            "stock_price".to_string(),
        ]);
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["company_info", "stock_price"]);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_is_an_error_not_a_panic() {
        let registry = ToolRegistry::new();
        let result = registry
            .execute("missing", serde_json::json!({}), &ToolContext::new())
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_execute_registered_tool() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("news_search", ToolGroup::News)));
        let result = registry
            .execute("news_search", serde_json::json!({}), &ToolContext::new())
            .await;
        assert!(result.success);
        assert_eq!(result.content, "mock result");
    }
}
