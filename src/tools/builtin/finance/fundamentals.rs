//! Key statistics and financial data via Yahoo quoteSummary

use super::{fetch_quote_summary, normalize_symbol, YahooNum};
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub struct StockFundamentalsTool {
    definition: ToolDefinition,
}

impl StockFundamentalsTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "symbol".to_string(),
            PropertySchema::string("Ticker symbol, e.g. 'MSFT'"),
        );

        StockFundamentalsTool {
            definition: ToolDefinition {
                name: "stock_fundamentals".to_string(),
                description: "Get key fundamentals for a stock as a Markdown table: valuation \
                              (enterprise value, forward P/E, PEG, price/book), earnings \
                              (trailing EPS), margins, revenue, cash/debt and analyst target."
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

impl Default for StockFundamentalsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct Params {
    symbol: String,
}

#[derive(Debug, Default, Deserialize)]
struct Modules {
    #[serde(rename = "defaultKeyStatistics", default)]
    key_statistics: Option<KeyStatistics>,
    #[serde(rename = "financialData", default)]
    financial_data: Option<FinancialData>,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatistics {
    #[serde(rename = "enterpriseValue", default)]
    enterprise_value: Option<YahooNum>,
    #[serde(rename = "forwardPE", default)]
    forward_pe: Option<YahooNum>,
    #[serde(rename = "pegRatio", default)]
    peg_ratio: Option<YahooNum>,
    #[serde(rename = "priceToBook", default)]
    price_to_book: Option<YahooNum>,
    #[serde(rename = "trailingEps", default)]
    trailing_eps: Option<YahooNum>,
    #[serde(default)]
    beta: Option<YahooNum>,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialData {
    #[serde(rename = "totalRevenue", default)]
    total_revenue: Option<YahooNum>,
    #[serde(rename = "grossMargins", default)]
    gross_margins: Option<YahooNum>,
    #[serde(rename = "profitMargins", default)]
    profit_margins: Option<YahooNum>,
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: Option<YahooNum>,
    #[serde(rename = "totalCash", default)]
    total_cash: Option<YahooNum>,
    #[serde(rename = "totalDebt", default)]
    total_debt: Option<YahooNum>,
    #[serde(rename = "freeCashflow", default)]
    free_cashflow: Option<YahooNum>,
    #[serde(rename = "targetMeanPrice", default)]
    target_mean_price: Option<YahooNum>,
}

fn push_row(rows: &mut Vec<String>, label: &str, value: &Option<YahooNum>) {
    if let Some(display) = value.as_ref().and_then(|v| v.display()) {
        rows.push(format!("| {} | {} |", label, display));
    }
}

fn format_fundamentals(symbol: &str, modules: &Modules) -> Option<String> {
    let mut rows = Vec::new();

    if let Some(stats) = &modules.key_statistics {
        push_row(&mut rows, "Enterprise Value", &stats.enterprise_value);
        push_row(&mut rows, "Forward P/E", &stats.forward_pe);
        push_row(&mut rows, "PEG Ratio", &stats.peg_ratio);
        push_row(&mut rows, "Price/Book", &stats.price_to_book);
        push_row(&mut rows, "Trailing EPS", &stats.trailing_eps);
        push_row(&mut rows, "Beta", &stats.beta);
    }
    if let Some(fin) = &modules.financial_data {
        push_row(&mut rows, "Total Revenue", &fin.total_revenue);
        push_row(&mut rows, "Gross Margin", &fin.gross_margins);
        push_row(&mut rows, "Profit Margin", &fin.profit_margins);
        push_row(&mut rows, "Return on Equity", &fin.return_on_equity);
        push_row(&mut rows, "Total Cash", &fin.total_cash);
        push_row(&mut rows, "Total Debt", &fin.total_debt);
        push_row(&mut rows, "Free Cash Flow", &fin.free_cashflow);
        push_row(&mut rows, "Analyst Target (mean)", &fin.target_mean_price);
    }

    if rows.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    lines.push(format!("Fundamentals for **{}**:", symbol));
    lines.push("| Metric | Value |".to_string());
    lines.push("|---|---|".to_string());
    lines.extend(rows);
    Some(lines.join("\n"))
}

#[async_trait]
impl Tool for StockFundamentalsTool {
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

        let result = match fetch_quote_summary(
            context.http_client(),
            &symbol,
            "defaultKeyStatistics,financialData",
        )
        .await
        {
            Ok(r) => r,
            Err(e) => return ToolResult::error(e),
        };

        let modules: Modules = match serde_json::from_value(result) {
            Ok(m) => m,
            Err(e) => return ToolResult::error(format!("Failed to parse response: {}", e)),
        };

        match format_fundamentals(&symbol, &modules) {
            Some(output) => ToolResult::success(output),
            None => ToolResult::error(format!("No fundamentals found for '{}'", symbol)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_fundamentals_table() {
        let modules: Modules = serde_json::from_value(serde_json::json!({
            "defaultKeyStatistics": {
                "enterpriseValue": {"raw": 3.4e12, "fmt": "3.40T"},
                "forwardPE": {"raw": 28.5, "fmt": "28.50"},
                "beta": {"raw": 1.21, "fmt": "1.21"}
            },
            "financialData": {
                "totalRevenue": {"raw": 3.9e11, "fmt": "390.00B"},
                "profitMargins": {"raw": 0.253, "fmt": "25.30%"}
            }
        }))
        .unwrap();

        let output = format_fundamentals("AAPL", &modules).unwrap();
        assert!(output.contains("Fundamentals for **AAPL**"));
        assert!(output.contains("| Metric | Value |"));
        assert!(output.contains("| Enterprise Value | 3.40T |"));
        assert!(output.contains("| Profit Margin | 25.30% |"));
        // Absent metrics produce no row at all
        assert!(!output.contains("PEG Ratio"));
    }

    #[test]
    fn test_format_fundamentals_empty_is_none() {
        let modules = Modules::default();
        assert!(format_fundamentals("AAPL", &modules).is_none());
    }
}
