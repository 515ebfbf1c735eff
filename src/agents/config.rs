use serde::Serialize;

/// Immutable description of one agent persona. Built once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AgentConfig {
    pub name: String,
    /// Short role statement woven into the system prompt
    pub role: Option<String>,
    /// Longer self-description; takes the place of a generated one
    pub description: Option<String>,
    pub model: String,
    /// Names of registry tools this persona may invoke, in advertised order
    pub tool_names: Vec<String>,
    /// Behavioral instructions, rendered as a numbered list
    pub instructions: Vec<String>,
    /// Surface intermediate tool calls to the user
    pub show_tool_calls: bool,
    /// Ask the model for Markdown output
    pub markdown: bool,
    /// Log the persona's runs at a higher verbosity
    pub debug_mode: bool,
}

/// Composite persona: an ordered member list run under one lead model and
/// a shared instruction set. Members keep their own tools and instructions.
#[derive(Debug, Clone, Serialize)]
pub struct TeamConfig {
    pub members: Vec<AgentConfig>,
    pub model: String,
    pub instructions: Vec<String>,
    pub show_tool_calls: bool,
    pub markdown: bool,
}
