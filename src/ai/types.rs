use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// AI API error with status code information
#[derive(Debug, Clone)]
pub struct AiError {
    /// Error message
    pub message: String,
    /// HTTP status code if available
    pub status_code: Option<u16>,
}

impl AiError {
    pub fn new(message: impl Into<String>) -> Self {
        AiError {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        AiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Check if this is a client error (4xx status code)
    pub fn is_client_error(&self) -> bool {
        self.status_code.map(|c| (400..500).contains(&c)).unwrap_or(false)
    }

    /// Check if this is a server error (5xx status code)
    pub fn is_server_error(&self) -> bool {
        self.status_code.map(|c| c >= 500).unwrap_or(false)
    }
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.status_code {
            write!(f, "[HTTP {}] {}", code, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for AiError {}

impl From<String> for AiError {
    fn from(s: String) -> Self {
        AiError::new(s)
    }
}

impl From<&str> for AiError {
    fn from(s: &str) -> Self {
        AiError::new(s)
    }
}

/// Represents a tool call made by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments to pass to the tool as JSON
    pub arguments: Value,
}

/// Represents the result of a tool execution to send back to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// ID of the tool call this responds to
    pub tool_call_id: String,
    /// Content of the tool response
    pub content: String,
    /// Whether the tool execution resulted in an error
    pub is_error: bool,
}

impl ToolResponse {
    pub fn success(tool_call_id: String, content: String) -> Self {
        ToolResponse {
            tool_call_id,
            content,
            is_error: false,
        }
    }

    pub fn error(tool_call_id: String, error: String) -> Self {
        ToolResponse {
            tool_call_id,
            content: error,
            is_error: true,
        }
    }
}

/// One round of tool calls and their responses, kept to continue the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolHistoryEntry {
    /// The tool calls made by the model
    pub tool_calls: Vec<ToolCall>,
    /// The responses from executing those tool calls
    pub tool_responses: Vec<ToolResponse>,
}

impl ToolHistoryEntry {
    pub fn new(tool_calls: Vec<ToolCall>, tool_responses: Vec<ToolResponse>) -> Self {
        ToolHistoryEntry {
            tool_calls,
            tool_responses,
        }
    }
}

/// Unified model response that can contain both text and tool calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    /// Text content of the response (may be empty if only tool calls)
    pub content: String,
    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason the model stopped generating
    pub stop_reason: Option<String>,
}

impl AiResponse {
    pub fn text(content: String) -> Self {
        AiResponse {
            content,
            tool_calls: vec![],
            stop_reason: Some("stop".to_string()),
        }
    }

    pub fn with_tools(content: String, tool_calls: Vec<ToolCall>) -> Self {
        AiResponse {
            content,
            tool_calls,
            stop_reason: Some("tool_calls".to_string()),
        }
    }

    /// Check if the response contains tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_response_text() {
        let response = AiResponse::text("Hello world".to_string());
        assert_eq!(response.content, "Hello world");
        assert!(response.tool_calls.is_empty());
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_ai_response_with_tools() {
        let tool_call = ToolCall {
            id: "call_123".to_string(),
            name: "web_search".to_string(),
            arguments: serde_json::json!({"query": "tesla"}),
        };
        let response = AiResponse::with_tools(String::new(), vec![tool_call]);

        assert!(response.has_tool_calls());
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.stop_reason.as_deref(), Some("tool_calls"));
    }

    #[test]
    fn test_tool_response() {
        let success = ToolResponse::success("call_123".to_string(), "Result".to_string());
        assert!(!success.is_error);

        let error = ToolResponse::error("call_456".to_string(), "Failed".to_string());
        assert!(error.is_error);
    }

    #[test]
    fn test_ai_error_status_classes() {
        let err = AiError::with_status("invalid api key", 401);
        assert!(err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.to_string(), "[HTTP 401] invalid api key");

        let err = AiError::with_status("upstream overloaded", 503);
        assert!(err.is_server_error());

        let err = AiError::new("connection refused");
        assert!(!err.is_client_error());
        assert!(!err.is_server_error());
        assert_eq!(err.to_string(), "connection refused");
    }
}
