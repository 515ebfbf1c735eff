use crate::agents::registry::AgentRegistry;
use crate::agents::runner::{
    build_system_prompt, build_team_prompt, classify_outcome, delegate_tool_definition,
    delegate_tool_name, RunOutcome, ToolCallRecord,
};

fn registry() -> AgentRegistry {
    AgentRegistry::new("qwen/qwen3-32b")
}

#[test]
fn test_classify_outcome_answered_keeps_content_verbatim() {
    let outcome = classify_outcome("**AAPL** looks solid.".to_string(), vec![]);
    match outcome {
        RunOutcome::Answered { content, .. } => assert_eq!(content, "**AAPL** looks solid."),
        _ => panic!("expected Answered"),
    }
}

#[test]
fn test_classify_outcome_blank_content_is_no_content() {
    let records = vec![ToolCallRecord {
        tool: "stock_price".to_string(),
        arguments: serde_json::json!({"symbol": "AAPL"}),
        success: true,
    }];
    match classify_outcome("   \n".to_string(), records) {
        RunOutcome::NoContent { tool_calls } => assert_eq!(tool_calls.len(), 1),
        _ => panic!("expected NoContent"),
    }
}

#[test]
fn test_system_prompt_for_role_persona() {
    let registry = registry();
    let prompt = build_system_prompt(registry.finance());
    assert!(prompt.starts_with("You are Finance Agent."));
    assert!(prompt.contains("Your role: Get financial data."));
    assert!(prompt.contains("1. Use tables to display data"));
    assert!(prompt.contains("Format your response as Markdown."));
}

#[test]
fn test_system_prompt_for_description_persona() {
    let registry = registry();
    let prompt = build_system_prompt(registry.news());
    // A description replaces the generated opener
    assert!(prompt.starts_with("You are a news agent that helps users find the latest news."));
    assert!(!prompt.contains("You are G Agent."));
    assert!(prompt.contains("3. Search in English and in French."));
    // The news persona does not ask for markdown
    assert!(!prompt.contains("Format your response as Markdown."));
}

#[test]
fn test_team_prompt_lists_members_and_shared_instructions() {
    let registry = registry();
    let prompt = build_team_prompt(registry.team());
    assert!(prompt.contains("- G Agent (`ask_g_agent`)"));
    assert!(prompt.contains("- Finance Agent (`ask_finance_agent`): Get financial data"));
    assert!(prompt.contains("1. Always include sources"));
    assert!(prompt.contains("2. Use tables to display data"));
    assert!(prompt.contains("Format your response as Markdown."));
}

#[test]
fn test_delegate_tool_name_slugs() {
    assert_eq!(delegate_tool_name("G Agent"), "ask_g_agent");
    assert_eq!(delegate_tool_name("Finance Agent"), "ask_finance_agent");
    assert_eq!(delegate_tool_name("  Weird--Name  "), "ask_weird__name");
}

#[test]
fn test_delegate_tool_definition_schema() {
    let registry = registry();
    let def = delegate_tool_definition(registry.finance());
    assert_eq!(def.name, "ask_finance_agent");
    assert!(def.description.contains("Finance Agent"));
    assert_eq!(def.input_schema.required, vec!["task"]);
    assert!(def.input_schema.properties.contains_key("task"));
}
