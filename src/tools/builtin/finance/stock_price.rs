//! Latest stock price via the Yahoo Finance chart endpoint

use super::{normalize_symbol, CHART_BASE};
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub struct StockPriceTool {
    definition: ToolDefinition,
}

impl StockPriceTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "symbol".to_string(),
            PropertySchema::string("Ticker symbol, e.g. 'AAPL' or 'TSLA'"),
        );

        StockPriceTool {
            definition: ToolDefinition {
                name: "stock_price".to_string(),
                description: "Get the latest market price for a stock: price, currency, \
                              exchange, and change versus the previous close."
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

impl Default for StockPriceTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Params {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    symbol: String,
    #[serde(default)]
    currency: Option<String>,
    #[serde(rename = "exchangeName", default)]
    exchange_name: Option<String>,
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose", default)]
    chart_previous_close: Option<f64>,
    #[serde(rename = "regularMarketTime", default)]
    regular_market_time: Option<i64>,
}

fn format_quote(meta: &ChartMeta) -> Option<String> {
    let price = meta.regular_market_price?;
    let currency = meta.currency.as_deref().unwrap_or("USD");

    let mut lines = Vec::new();
    let exchange = meta
        .exchange_name
        .as_deref()
        .map(|e| format!(" ({})", e))
        .unwrap_or_default();
    lines.push(format!("**{}**{}", meta.symbol, exchange));
    lines.push(format!("  Price: {:.2} {}", price, currency));

    if let Some(prev) = meta.chart_previous_close {
        if prev != 0.0 {
            let change = price - prev;
            let pct = change / prev * 100.0;
            lines.push(format!(
                "  Change: {:+.2} ({:+.2}%) vs previous close {:.2}",
                change, pct, prev
            ));
        }
    }

    if let Some(ts) = meta.regular_market_time {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            lines.push(format!("  As of: {}", dt.format("%Y-%m-%d %H:%M UTC")));
        }
    }

    Some(lines.join("\n"))
}

#[async_trait]
impl Tool for StockPriceTool {
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

        let url = format!(
            "{}/{}?range=1d&interval=1d",
            CHART_BASE,
            urlencoding::encode(&symbol)
        );

        let resp = match context
            .http_client()
            .get(&url)
            .timeout(std::time::Duration::from_secs(15))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ToolResult::error(format!("Yahoo Finance request failed: {}", e)),
        };

        if !resp.status().is_success() {
            return ToolResult::error(format!("Yahoo Finance API error: {}", resp.status()));
        }

        let envelope: ChartEnvelope = match resp.json().await {
            Ok(d) => d,
            Err(e) => return ToolResult::error(format!("Failed to parse response: {}", e)),
        };

        if let Some(error) = envelope.chart.error {
            return ToolResult::error(format!(
                "Yahoo Finance error for '{}': {}",
                symbol,
                error.description.unwrap_or_else(|| "unknown".to_string())
            ));
        }

        let result = match envelope.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) {
            Some(r) => r,
            None => return ToolResult::error(format!("No quote data for '{}'", symbol)),
        };

        match format_quote(&result.meta) {
            Some(output) => ToolResult::success(output),
            None => ToolResult::error(format!("Quote for '{}' carried no market price", symbol)),
        }
    }
}
