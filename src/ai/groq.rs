use crate::ai::types::{AiError, AiResponse, ToolCall, ToolHistoryEntry};
use crate::ai::Message;
use crate::tools::ToolDefinition;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Groq chat-completions client (OpenAI wire format, native function calling)
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GroqTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

/// One message on the OpenAI-format wire. Assistant turns that request tools
/// carry `tool_calls`; tool results go back as role `tool` with `tool_call_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<GroqToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl GroqMessage {
    pub fn text(role: &str, content: impl Into<String>) -> Self {
        GroqMessage {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
struct GroqTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: GroqToolFunction,
}

#[derive(Debug, Serialize, Clone)]
struct GroqToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroqToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: GroqFunctionCall,
}

/// The wire format carries `arguments` as a JSON-encoded string.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroqFunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<GroqToolCall>>,
}

#[derive(Debug, Deserialize)]
struct GroqErrorResponse {
    error: GroqErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GroqErrorDetail {
    message: String,
}

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 1500;

impl GroqClient {
    pub fn new(api_key: &str, endpoint: &str, model: &str) -> Self {
        Self {
            client: crate::http::shared_client().clone(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_text(&self, messages: Vec<Message>) -> Result<String, AiError> {
        let api_messages = messages
            .into_iter()
            .map(|m| GroqMessage::text(m.role.as_str(), m.content))
            .collect();

        let request = ChatRequest {
            model: self.model.clone(),
            messages: api_messages,
            tools: None,
            tool_choice: None,
        };

        let response = self.post_chat(&request).await?;
        let parsed = extract_content(response)?;
        if parsed.content.trim().is_empty() {
            return Err(AiError::new("Groq API returned no content"));
        }
        Ok(parsed.content)
    }

    /// Generate a response with native function calling.
    pub async fn generate_with_tools(
        &self,
        messages: Vec<Message>,
        tool_messages: Vec<GroqMessage>,
        tools: Vec<ToolDefinition>,
    ) -> Result<AiResponse, AiError> {
        let mut api_messages: Vec<GroqMessage> = messages
            .into_iter()
            .map(|m| GroqMessage::text(m.role.as_str(), m.content))
            .collect();

        // Tool conversation history from earlier iterations
        api_messages.extend(tool_messages);

        let groq_tools: Vec<GroqTool> = tools
            .into_iter()
            .map(|t| GroqTool {
                tool_type: "function".to_string(),
                function: GroqToolFunction {
                    name: t.name,
                    description: t.description,
                    parameters: serde_json::to_value(t.input_schema).unwrap_or_default(),
                },
            })
            .collect();

        let request = ChatRequest {
            model: self.model.clone(),
            messages: api_messages,
            tool_choice: if groq_tools.is_empty() {
                None
            } else {
                Some("auto".to_string())
            },
            tools: if groq_tools.is_empty() {
                None
            } else {
                Some(groq_tools)
            },
        };

        let response = self.post_chat(&request).await?;
        Ok(extract_content(response)?)
    }

    /// Single POST with transient-error retry (429/5xx, exponential backoff).
    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        log::debug!(
            "[GROQ] Request to {}: {}",
            self.endpoint,
            serde_json::to_string(request).unwrap_or_default()
        );

        let mut last_error: Option<AiError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay_ms = BASE_DELAY_MS * (1 << (attempt - 1));
                log::warn!(
                    "[GROQ] Retry attempt {}/{} after {}ms delay",
                    attempt,
                    MAX_RETRIES,
                    delay_ms
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            let request_result = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .timeout(Duration::from_secs(300))
                .json(request)
                .send()
                .await;

            let response = match request_result {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(AiError::new(format!("Groq API request failed: {}", e)));
                    if attempt < MAX_RETRIES {
                        log::warn!(
                            "[GROQ] Request failed (attempt {}): {}, will retry",
                            attempt + 1,
                            e
                        );
                        continue;
                    }
                    return Err(last_error.unwrap());
                }
            };

            let status = response.status();
            let status_code = status.as_u16();

            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                let message = match serde_json::from_str::<GroqErrorResponse>(&error_text) {
                    Ok(parsed) => parsed.error.message,
                    Err(_) => error_text,
                };
                let error = AiError::with_status(format!("Groq API error: {}", message), status_code);

                let is_retryable = matches!(status_code, 429 | 502 | 503 | 504);
                if is_retryable && attempt < MAX_RETRIES {
                    log::warn!(
                        "[GROQ] Received retryable status {} (attempt {}), will retry",
                        status,
                        attempt + 1
                    );
                    last_error = Some(error);
                    continue;
                }
                return Err(error);
            }

            return response
                .json()
                .await
                .map_err(|e| AiError::new(format!("Failed to parse Groq response: {}", e)));
        }

        Err(last_error.unwrap_or_else(|| AiError::new("Max retries exceeded")))
    }

    /// Build the assistant-with-tool-calls and role-`tool` messages for
    /// continuing the conversation after a round of tool execution.
    pub fn build_tool_result_messages(
        tool_calls: &[ToolCall],
        tool_responses: &[crate::ai::ToolResponse],
    ) -> Vec<GroqMessage> {
        let mut messages = Vec::new();

        let wire_calls: Vec<GroqToolCall> = tool_calls
            .iter()
            .map(|tc| GroqToolCall {
                id: tc.id.clone(),
                call_type: "function".to_string(),
                function: GroqFunctionCall {
                    name: tc.name.clone(),
                    arguments: tc.arguments.to_string(),
                },
            })
            .collect();

        messages.push(GroqMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(wire_calls),
            tool_call_id: None,
        });

        for response in tool_responses {
            messages.push(GroqMessage {
                role: "tool".to_string(),
                content: Some(response.content.clone()),
                tool_calls: None,
                tool_call_id: Some(response.tool_call_id.clone()),
            });
        }

        messages
    }

    /// Flatten accumulated history entries into wire messages.
    pub fn build_tool_history_messages(history: &[ToolHistoryEntry]) -> Vec<GroqMessage> {
        let mut messages = Vec::new();
        for entry in history {
            messages.extend(Self::build_tool_result_messages(
                &entry.tool_calls,
                &entry.tool_responses,
            ));
        }
        messages
    }
}

fn extract_content(response: ChatResponse) -> Result<AiResponse, AiError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AiError::new("Groq API returned no choices"))?;

    let mut tool_calls = Vec::new();
    if let Some(calls) = choice.message.tool_calls {
        for (idx, call) in calls.into_iter().enumerate() {
            let arguments = match serde_json::from_str::<Value>(&call.function.arguments) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!(
                        "[GROQ] Tool call '{}' carried unparseable arguments: {}",
                        call.function.name,
                        e
                    );
                    serde_json::json!({})
                }
            };
            tool_calls.push(ToolCall {
                id: if call.id.is_empty() {
                    format!("call_{}", idx)
                } else {
                    call.id
                },
                name: call.function.name,
                arguments,
            });
        }
    }

    Ok(AiResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        stop_reason: choice.finish_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ToolResponse;

    #[test]
    fn test_extract_content_text_only() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"AAPL looks strong."},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        let ai = extract_content(response).unwrap();
        assert_eq!(ai.content, "AAPL looks strong.");
        assert!(ai.tool_calls.is_empty());
        assert_eq!(ai.stop_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_extract_content_with_tool_calls() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null,
                "tool_calls":[{"id":"call_abc","type":"function",
                "function":{"name":"stock_price","arguments":"{\"symbol\":\"TSLA\"}"}}]},
                "finish_reason":"tool_calls"}]}"#,
        )
        .unwrap();
        let ai = extract_content(response).unwrap();
        assert_eq!(ai.content, "");
        assert_eq!(ai.tool_calls.len(), 1);
        assert_eq!(ai.tool_calls[0].name, "stock_price");
        assert_eq!(ai.tool_calls[0].arguments["symbol"], "TSLA");
    }

    #[test]
    fn test_extract_content_bad_arguments_fall_back_to_empty_object() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null,
                "tool_calls":[{"id":"call_1","type":"function",
                "function":{"name":"web_search","arguments":"not json"}}]},
                "finish_reason":"tool_calls"}]}"#,
        )
        .unwrap();
        let ai = extract_content(response).unwrap();
        assert_eq!(ai.tool_calls[0].arguments, serde_json::json!({}));
    }

    #[test]
    fn test_extract_content_no_choices() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_content(response).is_err());
    }

    #[test]
    fn test_build_tool_result_messages() {
        let calls = vec![ToolCall {
            id: "call_1".to_string(),
            name: "news_search".to_string(),
            arguments: serde_json::json!({"query": "tesla"}),
        }];
        let responses = vec![ToolResponse::success(
            "call_1".to_string(),
            "3 items".to_string(),
        )];

        let messages = GroqClient::build_tool_result_messages(&calls, &responses);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "assistant");
        let wire_calls = messages[0].tool_calls.as_ref().unwrap();
        assert_eq!(wire_calls[0].function.name, "news_search");
        // Arguments must round-trip as a JSON-encoded string on the wire
        assert_eq!(
            serde_json::from_str::<Value>(&wire_calls[0].function.arguments).unwrap(),
            serde_json::json!({"query": "tesla"})
        );
        assert_eq!(messages[1].role, "tool");
        assert_eq!(messages[1].tool_call_id.as_deref(), Some("call_1"));
    }
}
