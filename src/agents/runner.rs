use crate::agents::config::{AgentConfig, TeamConfig};
use crate::agents::selection::Selected;
use crate::ai::{AiError, GroqClient, Message, ToolHistoryEntry, ToolResponse};
use crate::tools::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolRegistry,
    ToolResult,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of tool execution iterations per run
const MAX_TOOL_ITERATIONS: usize = 10;

/// One executed tool call, kept for the user-visible trace
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallRecord {
    pub tool: String,
    pub arguments: Value,
    pub success: bool,
}

/// The three ways a run can end. Faults are a variant, not a panic or a
/// caught exception: the runner always returns.
#[derive(Debug)]
pub enum RunOutcome {
    /// The model produced text content
    Answered {
        content: String,
        tool_calls: Vec<ToolCallRecord>,
    },
    /// The run completed but carried no extractable text
    NoContent { tool_calls: Vec<ToolCallRecord> },
    /// Provider or transport fault
    Failed(AiError),
}

/// Executes one query against one selected configuration
pub struct AgentRunner {
    tool_registry: Arc<ToolRegistry>,
    endpoint: String,
    api_key: String,
}

impl AgentRunner {
    pub fn new(tool_registry: Arc<ToolRegistry>, endpoint: String, api_key: String) -> Self {
        Self {
            tool_registry,
            endpoint,
            api_key,
        }
    }

    fn client_for(&self, model: &str) -> GroqClient {
        GroqClient::new(&self.api_key, &self.endpoint, model)
    }

    /// One attempt per call. No retries at this level, no cancellation.
    pub async fn run(&self, selected: Selected<'_>, query: &str) -> RunOutcome {
        match selected {
            Selected::Single(config) => {
                log::info!("[RUNNER] Running agent '{}' ({})", config.name, config.model);
                let mut records = Vec::new();
                match self.drive_agent(config, query, &mut records).await {
                    Ok(content) => classify_outcome(content, records),
                    Err(e) => {
                        log::error!("[RUNNER] Agent '{}' failed: {}", config.name, e);
                        RunOutcome::Failed(e)
                    }
                }
            }
            Selected::Team(team) => {
                log::info!(
                    "[RUNNER] Running team of {} members ({})",
                    team.members.len(),
                    team.model
                );
                let mut records = Vec::new();
                match self.drive_team(team, query, &mut records).await {
                    Ok(content) => classify_outcome(content, records),
                    Err(e) => {
                        log::error!("[RUNNER] Team run failed: {}", e);
                        RunOutcome::Failed(e)
                    }
                }
            }
        }
    }

    /// Native tool-calling loop for a single persona: model turn, execute
    /// requested tools, feed results back, until the model answers in text.
    async fn drive_agent(
        &self,
        config: &AgentConfig,
        query: &str,
        records: &mut Vec<ToolCallRecord>,
    ) -> Result<String, AiError> {
        let client = self.client_for(&config.model);
        let tools = self.tool_registry.definitions_for(&config.tool_names);
        let context = ToolContext::new();

        let messages = vec![
            Message::system(build_system_prompt(config)),
            Message::user(query),
        ];
        let mut history: Vec<ToolHistoryEntry> = Vec::new();

        for iteration in 1..=MAX_TOOL_ITERATIONS {
            if config.debug_mode {
                log::info!("[AGENT {}] Iteration {} starting", config.name, iteration);
            }

            let response = client
                .generate_with_tools(
                    messages.clone(),
                    GroqClient::build_tool_history_messages(&history),
                    tools.clone(),
                )
                .await?;

            if !response.has_tool_calls() {
                return Ok(response.content);
            }

            let mut responses = Vec::new();
            for call in &response.tool_calls {
                if config.debug_mode {
                    log::info!(
                        "[AGENT {}] Tool call: {} with params: {}",
                        config.name,
                        call.name,
                        call.arguments
                    );
                } else {
                    log::info!("[AGENT {}] Tool call: {}", config.name, call.name);
                }

                // The model may only call tools this persona advertises
                let result = if config.tool_names.iter().any(|n| n == &call.name) {
                    self.tool_registry
                        .execute(&call.name, call.arguments.clone(), &context)
                        .await
                } else {
                    ToolResult::error(format!("Tool '{}' is not available to this agent", call.name))
                };

                records.push(ToolCallRecord {
                    tool: call.name.clone(),
                    arguments: call.arguments.clone(),
                    success: result.success,
                });
                responses.push(to_tool_response(&call.id, result));
            }
            history.push(ToolHistoryEntry::new(response.tool_calls, responses));
        }

        log::warn!(
            "[AGENT {}] Tool loop exceeded max iterations ({})",
            config.name,
            MAX_TOOL_ITERATIONS
        );
        Ok(String::new())
    }

    /// Team run: the lead model sees one delegation tool per member and
    /// composes the final answer from their replies. Each delegation
    /// executes that member's own single-agent loop.
    async fn drive_team(
        &self,
        team: &TeamConfig,
        query: &str,
        records: &mut Vec<ToolCallRecord>,
    ) -> Result<String, AiError> {
        let client = self.client_for(&team.model);
        let delegate_tools: Vec<ToolDefinition> = team
            .members
            .iter()
            .map(delegate_tool_definition)
            .collect();

        let messages = vec![
            Message::system(build_team_prompt(team)),
            Message::user(query),
        ];
        let mut history: Vec<ToolHistoryEntry> = Vec::new();

        for _iteration in 1..=MAX_TOOL_ITERATIONS {
            let response = client
                .generate_with_tools(
                    messages.clone(),
                    GroqClient::build_tool_history_messages(&history),
                    delegate_tools.clone(),
                )
                .await?;

            if !response.has_tool_calls() {
                return Ok(response.content);
            }

            let mut responses = Vec::new();
            for call in &response.tool_calls {
                let member = team
                    .members
                    .iter()
                    .find(|m| delegate_tool_name(&m.name) == call.name);

                let result = match member {
                    Some(member) => {
                        let task = call
                            .arguments
                            .get("task")
                            .and_then(|v| v.as_str())
                            .unwrap_or(query);
                        log::info!("[TEAM] Delegating to '{}': {}", member.name, task);
                        match self.drive_agent(member, task, records).await {
                            Ok(content) if !content.trim().is_empty() => {
                                ToolResult::success(content)
                            }
                            Ok(_) => ToolResult::error(format!(
                                "{} returned no content",
                                member.name
                            )),
                            Err(e) => {
                                ToolResult::error(format!("{} failed: {}", member.name, e))
                            }
                        }
                    }
                    None => {
                        ToolResult::error(format!("Unknown team member tool '{}'", call.name))
                    }
                };

                records.push(ToolCallRecord {
                    tool: call.name.clone(),
                    arguments: call.arguments.clone(),
                    success: result.success,
                });
                responses.push(to_tool_response(&call.id, result));
            }
            history.push(ToolHistoryEntry::new(response.tool_calls, responses));
        }

        log::warn!(
            "[TEAM] Delegation loop exceeded max iterations ({})",
            MAX_TOOL_ITERATIONS
        );
        Ok(String::new())
    }
}

fn to_tool_response(call_id: &str, result: ToolResult) -> ToolResponse {
    if result.success {
        ToolResponse::success(call_id.to_string(), result.content)
    } else {
        ToolResponse::error(
            call_id.to_string(),
            result
                .error
                .unwrap_or_else(|| "tool execution failed".to_string()),
        )
    }
}

/// Empty text means a degraded success, not a fault
pub(crate) fn classify_outcome(content: String, tool_calls: Vec<ToolCallRecord>) -> RunOutcome {
    if content.trim().is_empty() {
        RunOutcome::NoContent { tool_calls }
    } else {
        RunOutcome::Answered {
            content,
            tool_calls,
        }
    }
}

pub(crate) fn build_system_prompt(config: &AgentConfig) -> String {
    let mut sections = Vec::new();

    match &config.description {
        Some(description) => sections.push(description.clone()),
        None => sections.push(format!("You are {}.", config.name)),
    }
    if let Some(role) = &config.role {
        sections.push(format!("Your role: {}.", role));
    }
    if !config.instructions.is_empty() {
        let mut block = String::from("Instructions:");
        for (idx, instruction) in config.instructions.iter().enumerate() {
            block.push_str(&format!("\n{}. {}", idx + 1, instruction));
        }
        sections.push(block);
    }
    if config.markdown {
        sections.push("Format your response as Markdown.".to_string());
    }

    sections.join("\n\n")
}

pub(crate) fn build_team_prompt(team: &TeamConfig) -> String {
    let mut sections = Vec::new();
    sections.push(
        "You lead a team of agents. Delegate work with the tools below, then compose one \
         final answer from their replies."
            .to_string(),
    );

    let mut roster = String::from("Team members:");
    for member in &team.members {
        let what = member
            .role
            .as_deref()
            .or(member.description.as_deref())
            .unwrap_or("general assistance");
        roster.push_str(&format!(
            "\n- {} (`{}`): {}",
            member.name,
            delegate_tool_name(&member.name),
            what
        ));
    }
    sections.push(roster);

    if !team.instructions.is_empty() {
        let mut block = String::from("Instructions:");
        for (idx, instruction) in team.instructions.iter().enumerate() {
            block.push_str(&format!("\n{}. {}", idx + 1, instruction));
        }
        sections.push(block);
    }
    if team.markdown {
        sections.push("Format your response as Markdown.".to_string());
    }

    sections.join("\n\n")
}

/// `"G Agent"` → `ask_g_agent`
pub(crate) fn delegate_tool_name(member_name: &str) -> String {
    let slug: String = member_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("ask_{}", slug.trim_matches('_'))
}

pub(crate) fn delegate_tool_definition(member: &AgentConfig) -> ToolDefinition {
    let mut properties = HashMap::new();
    properties.insert(
        "task".to_string(),
        PropertySchema::string("The task or question to hand to this agent, in plain language"),
    );

    let what = member
        .role
        .as_deref()
        .or(member.description.as_deref())
        .unwrap_or("general assistance");

    ToolDefinition {
        name: delegate_tool_name(&member.name),
        description: format!("Delegate a task to {} ({}).", member.name, what),
        input_schema: ToolInputSchema {
            schema_type: "object".to_string(),
            properties,
            required: vec!["task".to_string()],
        },
        group: ToolGroup::Team,
    }
}
