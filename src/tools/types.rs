use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Capability group a tool belongs to. Each agent persona lists its tools
/// by name; the group is informational (logging, UI) rather than an
/// access-control gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolGroup {
    Web,
    News,
    Finance,
    /// Delegation tools synthesized for team runs
    Team,
}

/// Tool definition advertised to the model
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
    #[serde(skip)]
    pub group: ToolGroup,
}

/// JSON-schema object for a tool's parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: HashMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties: HashMap::new(),
            required: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl PropertySchema {
    /// Shorthand for the common string-typed parameter
    pub fn string(description: impl Into<String>) -> Self {
        PropertySchema {
            schema_type: "string".to_string(),
            description: description.into(),
            default: None,
            items: None,
            enum_values: None,
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        PropertySchema {
            schema_type: "integer".to_string(),
            description: description.into(),
            default: None,
            items: None,
            enum_values: None,
        }
    }
}

/// Result of a tool execution, fed back to the model as tool output
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        ToolResult {
            success: true,
            content: content.into(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        ToolResult {
            success: false,
            content: message.clone(),
            error: Some(message),
        }
    }
}

/// Per-run context handed to every tool execution
#[derive(Clone)]
pub struct ToolContext {
    client: reqwest::Client,
}

impl ToolContext {
    pub fn new() -> Self {
        ToolContext {
            client: crate::http::shared_client().clone(),
        }
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_schema_serializes_with_json_schema_keys() {
        let mut properties = HashMap::new();
        properties.insert(
            "symbol".to_string(),
            PropertySchema::string("Ticker symbol, e.g. 'AAPL'"),
        );
        let schema = ToolInputSchema {
            schema_type: "object".to_string(),
            properties,
            required: vec!["symbol".to_string()],
        };

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["symbol"]["type"], "string");
        assert_eq!(value["required"][0], "symbol");
        // Optional schema fields stay off the wire when unset
        assert!(value["properties"]["symbol"].get("enum").is_none());
    }

    #[test]
    fn test_tool_result_error_mirrors_message() {
        let result = ToolResult::error("request failed");
        assert!(!result.success);
        assert_eq!(result.content, "request failed");
        assert_eq!(result.error.as_deref(), Some("request failed"));
    }
}
