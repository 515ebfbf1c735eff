pub mod builtin;
pub mod registry;
pub mod types;

pub use registry::{Tool, ToolRegistry};
pub use types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};

use std::sync::Arc;

/// Create a registry with all built-in tools registered
pub fn create_default_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();

    // Web + news search
    registry.register(Arc::new(builtin::DuckDuckGoSearchTool::new()));
    registry.register(Arc::new(builtin::NewsSearchTool::new()));

    // Yahoo Finance market data
    registry.register(Arc::new(builtin::StockPriceTool::new()));
    registry.register(Arc::new(builtin::AnalystRecommendationsTool::new()));
    registry.register(Arc::new(builtin::StockFundamentalsTool::new()));
    registry.register(Arc::new(builtin::CompanyInfoTool::new()));

    registry
}
