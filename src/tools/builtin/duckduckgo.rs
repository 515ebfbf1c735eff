//! DuckDuckGo web search tool
//!
//! Queries the DuckDuckGo Instant Answer API and returns the topic
//! abstract plus related results, each with its source URL so the model
//! can cite sources.

use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const API_BASE: &str = "https://api.duckduckgo.com/";
const DEFAULT_MAX_RESULTS: usize = 8;

pub struct DuckDuckGoSearchTool {
    definition: ToolDefinition,
}

impl DuckDuckGoSearchTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "query".to_string(),
            PropertySchema::string("Search query, e.g. 'Tesla Q2 earnings'"),
        );
        properties.insert(
            "max_results".to_string(),
            PropertySchema::integer("Maximum number of results to return (default 8)"),
        );

        DuckDuckGoSearchTool {
            definition: ToolDefinition {
                name: "web_search".to_string(),
                description: "Search the web with DuckDuckGo. Returns a topic summary and \
                              related results, each with its source URL. Cite the URLs when \
                              you use a result."
                    .to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["query".to_string()],
                },
                group: ToolGroup::Web,
            },
        }
    }
}

impl Default for DuckDuckGoSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Params {
    query: String,
    max_results: Option<usize>,
}

// Instant Answer API response (field names are the API's own)
#[derive(Debug, Default, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "AbstractSource", default)]
    abstract_source: String,
    #[serde(rename = "Answer", default)]
    answer: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Related topics are either direct results or nested category groups
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Result {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL")]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics", default)]
        topics: Vec<RelatedTopic>,
    },
    Other(Value),
}

fn flatten_topics(topics: &[RelatedTopic], out: &mut Vec<(String, String)>, limit: usize) {
    for topic in topics {
        if out.len() >= limit {
            return;
        }
        match topic {
            RelatedTopic::Result { text, first_url } => {
                if !text.is_empty() && !first_url.is_empty() {
                    out.push((text.clone(), first_url.clone()));
                }
            }
            RelatedTopic::Group { topics } => flatten_topics(topics, out, limit),
            RelatedTopic::Other(_) => {}
        }
    }
}

fn format_answer(answer: &InstantAnswer, query: &str, max_results: usize) -> Option<String> {
    let mut lines = Vec::new();

    if !answer.answer.is_empty() {
        lines.push(format!("Answer: {}", answer.answer));
    }

    if !answer.abstract_text.is_empty() {
        let heading = if answer.heading.is_empty() {
            query
        } else {
            answer.heading.as_str()
        };
        lines.push(format!("**{}**: {}", heading, answer.abstract_text));
        if !answer.abstract_url.is_empty() {
            let source = if answer.abstract_source.is_empty() {
                "source"
            } else {
                answer.abstract_source.as_str()
            };
            lines.push(format!("  Source: {} ({})", answer.abstract_url, source));
        }
    }

    let mut results = Vec::new();
    flatten_topics(&answer.related_topics, &mut results, max_results);
    if !results.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Related results:".to_string());
        for (idx, (text, url)) in results.iter().enumerate() {
            lines.push(format!("{}. {} — {}", idx + 1, text, url));
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[async_trait]
impl Tool for DuckDuckGoSearchTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: Params = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };

        if params.query.trim().is_empty() {
            return ToolResult::error("'query' is required");
        }
        let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);

        let url = format!(
            "{}?q={}&format=json&no_html=1&skip_disambig=1",
            API_BASE,
            urlencoding::encode(params.query.trim())
        );

        let resp = match context
            .http_client()
            .get(&url)
            .timeout(std::time::Duration::from_secs(15))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ToolResult::error(format!("DuckDuckGo request failed: {}", e)),
        };

        if !resp.status().is_success() {
            return ToolResult::error(format!("DuckDuckGo API error: {}", resp.status()));
        }

        let answer: InstantAnswer = match resp.json().await {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("Failed to parse response: {}", e)),
        };

        match format_answer(&answer, params.query.trim(), max_results) {
            Some(output) => ToolResult::success(output),
            None => ToolResult::error(format!(
                "No results found for '{}'. Try a different query.",
                params.query
            )),
        }
    }
}
