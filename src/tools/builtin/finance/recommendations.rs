//! Analyst recommendation trend via Yahoo quoteSummary

use super::{fetch_quote_summary, normalize_symbol};
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub struct AnalystRecommendationsTool {
    definition: ToolDefinition,
}

impl AnalystRecommendationsTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "symbol".to_string(),
            PropertySchema::string("Ticker symbol, e.g. 'AAPL'"),
        );

        AnalystRecommendationsTool {
            definition: ToolDefinition {
                name: "analyst_recommendations".to_string(),
                description: "Get the analyst recommendation trend for a stock (strong buy / \
                              buy / hold / sell / strong sell counts for the current month and \
                              the three months before it), as a Markdown table."
                    .to_string(),
                input_schema: ToolInputSchema {
                    schema_type: "object".to_string(),
                    properties,
                    required: vec!["symbol".to_string()],
                },
                group: ToolGroup::Finance,
            },
        }
    }
}

impl Default for AnalystRecommendationsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Params {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct Modules {
    #[serde(rename = "recommendationTrend")]
    recommendation_trend: Option<TrendModule>,
}

#[derive(Debug, Deserialize)]
struct TrendModule {
    #[serde(default)]
    trend: Vec<TrendEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendEntry {
    period: String,
    #[serde(rename = "strongBuy", default)]
    strong_buy: i64,
    #[serde(default)]
    buy: i64,
    #[serde(default)]
    hold: i64,
    #[serde(default)]
    sell: i64,
    #[serde(rename = "strongSell", default)]
    strong_sell: i64,
}

fn period_label(period: &str) -> String {
    match period {
        "0m" => "Current".to_string(),
        "-1m" => "1 month ago".to_string(),
        "-2m" => "2 months ago".to_string(),
        "-3m" => "3 months ago".to_string(),
        other => other.to_string(),
    }
}

fn format_trend(symbol: &str, trend: &[TrendEntry]) -> Option<String> {
    if trend.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    lines.push(format!("Analyst recommendations for **{}**:", symbol));
    lines.push("| Period | Strong Buy | Buy | Hold | Sell | Strong Sell |".to_string());
    lines.push("|---|---|---|---|---|---|".to_string());
    for entry in trend {
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} |",
            period_label(&entry.period),
            entry.strong_buy,
            entry.buy,
            entry.hold,
            entry.sell,
            entry.strong_sell
        ));
    }
    Some(lines.join("\n"))
}

#[async_trait]
impl Tool for AnalystRecommendationsTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let params: Params = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(format!("Invalid parameters: {}", e)),
        };
        let symbol = normalize_symbol(&params.symbol);
        if symbol.is_empty() {
            return ToolResult::error("'symbol' is required");
        }

        let result =
            match fetch_quote_summary(context.http_client(), &symbol, "recommendationTrend").await
            {
                Ok(r) => r,
                Err(e) => return ToolResult::error(e),
            };

        let modules: Modules = match serde_json::from_value(result) {
            Ok(m) => m,
            Err(e) => return ToolResult::error(format!("Failed to parse response: {}", e)),
        };

        let trend = modules
            .recommendation_trend
            .map(|t| t.trend)
            .unwrap_or_default();

        match format_trend(&symbol, &trend) {
            Some(output) => ToolResult::success(output),
            None => ToolResult::error(format!("No analyst recommendations found for '{}'", symbol)),
        }
    }
}
