//! Google News search tool
//!
//! Queries the Google News RSS search feed and returns the latest items
//! for a topic. Supports an optional language parameter so personas can
//! search in more than one language.

use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const FEED_BASE: &str = "https://news.google.com/rss/search";
const DEFAULT_MAX_ITEMS: usize = 10;

pub struct NewsSearchTool {
    definition: ToolDefinition,
}

impl NewsSearchTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "query".to_string(),
            PropertySchema::string("News topic to search for, e.g. 'Nvidia earnings'"),
        );
        let mut lang = PropertySchema::string(
            "Feed language. Use 'en' for English or 'fr' for French. Defaults to 'en'.",
        );
        lang.enum_values = Some(vec!["en".to_string(), "fr".to_string()]);
        properties.insert("lang".to_string(), lang);
        properties.insert(
            "max_items".to_string(),
            PropertySchema::integer("Maximum number of news items to return (default 10)"),
        );

        NewsSearchTool {
            definition: ToolDefinition {
                name: "news_search".to_string(),
                description: "Search Google News for the latest articles on a topic. Returns \
                              up to 10 items with title, source, publication date and link. \
                              Call once per language when multilingual coverage is needed."
                    .to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["query".to_string()],
                },
                group: ToolGroup::News,
            },
        }
    }
}

impl Default for NewsSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Params {
    query: String,
    lang: Option<String>,
    max_items: Option<usize>,
}

// RSS document shape, as much of it as we read
#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
    #[serde(default)]
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
struct Source {
    #[serde(rename = "$text", default)]
    name: Option<String>,
}

/// Feed URL with the locale parameters Google News expects per language
fn feed_url(query: &str, lang: &str) -> String {
    let (hl, gl, ceid) = match lang {
        "fr" => ("fr", "FR", "FR:fr"),
        _ => ("en-US", "US", "US:en"),
    };
    format!(
        "{}?q={}&hl={}&gl={}&ceid={}",
        FEED_BASE,
        urlencoding::encode(query),
        hl,
        gl,
        ceid
    )
}

/// RFC-2822 pubDate → compact display date; unparseable dates pass through
fn format_pub_date(raw: &str) -> String {
    match DateTime::parse_from_rfc2822(raw) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn format_items(items: &[Item], max_items: usize) -> Option<String> {
    let mut lines = Vec::new();
    for item in items.iter().take(max_items) {
        let title = match item.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => continue,
        };
        let mut line = format!("{}. {}", lines.len() + 1, title);
        if let Some(source) = item.source.as_ref().and_then(|s| s.name.as_deref()) {
            line.push_str(&format!(" — {}", source));
        }
        if let Some(date) = item.pub_date.as_deref() {
            line.push_str(&format!(" ({})", format_pub_date(date)));
        }
        if let Some(link) = item.link.as_deref() {
            line.push_str(&format!("\n   {}", link));
        }
        lines.push(line);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
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
        let lang = params.lang.as_deref().unwrap_or("en");
        let max_items = params.max_items.unwrap_or(DEFAULT_MAX_ITEMS);

        let url = feed_url(params.query.trim(), lang);
        let resp = match context
            .http_client()
            .get(&url)
            .timeout(std::time::Duration::from_secs(15))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ToolResult::error(format!("Google News request failed: {}", e)),
        };

        if !resp.status().is_success() {
            return ToolResult::error(format!("Google News feed error: {}", resp.status()));
        }

        let body = match resp.text().await {
            Ok(b) => b,
            Err(e) => return ToolResult::error(format!("Failed to read feed body: {}", e)),
        };

        let rss: Rss = match quick_xml::de::from_str(&body) {
            Ok(r) => r,
            Err(e) => return ToolResult::error(format!("Failed to parse feed: {}", e)),
        };

        match format_items(&rss.channel.items, max_items) {
            Some(output) => ToolResult::success(output),
            None => ToolResult::error(format!(
                "No news found for '{}' ({}). Try a broader topic.",
                params.query, lang
            )),
        }
    }
}
