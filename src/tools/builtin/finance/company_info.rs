//! Company profile via Yahoo quoteSummary

use super::{fetch_quote_summary, format_large_number, normalize_symbol, YahooNum};
use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolGroup, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const SUMMARY_MAX_CHARS: usize = 900;

pub struct CompanyInfoTool {
    definition: ToolDefinition,
}

impl CompanyInfoTool {
    pub fn new() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            "symbol".to_string(),
            PropertySchema::string("Ticker symbol, e.g. 'NVDA'"),
        );

        CompanyInfoTool {
            definition: ToolDefinition {
                name: "company_info".to_string(),
                description: "Get the company profile for a stock: name, sector, industry, \
                              headquarters, employee count, market cap, website and a business \
                              summary."
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

impl Default for CompanyInfoTool {
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
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<PriceModule>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    #[serde(default)]
    sector: Option<String>,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(rename = "fullTimeEmployees", default)]
    full_time_employees: Option<i64>,
    #[serde(rename = "longBusinessSummary", default)]
    long_business_summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName", default)]
    long_name: Option<String>,
    #[serde(rename = "marketCap", default)]
    market_cap: Option<YahooNum>,
    #[serde(default)]
    currency: Option<String>,
}

fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_MAX_CHARS {
        return summary.to_string();
    }
    let truncated: String = summary.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{}…", truncated.trim_end())
}

fn format_profile(symbol: &str, modules: &Modules) -> Option<String> {
    let profile = modules.asset_profile.as_ref();
    let price = modules.price.as_ref();

    let name = price
        .and_then(|p| p.long_name.as_deref())
        .unwrap_or(symbol);

    let mut lines = Vec::new();
    lines.push(format!("**{}** ({})", name, symbol));

    if let Some(profile) = profile {
        match (profile.sector.as_deref(), profile.industry.as_deref()) {
            (Some(sector), Some(industry)) => {
                lines.push(format!("  Sector: {} / {}", sector, industry))
            }
            (Some(sector), None) => lines.push(format!("  Sector: {}", sector)),
            (None, Some(industry)) => lines.push(format!("  Industry: {}", industry)),
            (None, None) => {}
        }
        match (profile.city.as_deref(), profile.country.as_deref()) {
            (Some(city), Some(country)) => lines.push(format!("  HQ: {}, {}", city, country)),
            (None, Some(country)) => lines.push(format!("  HQ: {}", country)),
            _ => {}
        }
        if let Some(employees) = profile.full_time_employees {
            lines.push(format!("  Employees: {}", employees));
        }
        if let Some(website) = profile.website.as_deref() {
            lines.push(format!("  Website: {}", website));
        }
    }

    if let Some(price) = price {
        if let Some(cap) = price.market_cap.as_ref().and_then(|c| c.raw) {
            let currency = price.currency.as_deref().unwrap_or("USD");
            lines.push(format!(
                "  Market Cap: {} {}",
                format_large_number(cap),
                currency
            ));
        }
    }

    if let Some(summary) = profile.and_then(|p| p.long_business_summary.as_deref()) {
        lines.push(String::new());
        lines.push(truncate_summary(summary));
    }

    // A bare symbol header means the API returned nothing usable
    if lines.len() <= 1 {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[async_trait]
impl Tool for CompanyInfoTool {
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
            match fetch_quote_summary(context.http_client(), &symbol, "assetProfile,price").await {
                Ok(r) => r,
                Err(e) => return ToolResult::error(e),
            };

        let modules: Modules = match serde_json::from_value(result) {
            Ok(m) => m,
            Err(e) => return ToolResult::error(format!("Failed to parse response: {}", e)),
        };

        match format_profile(&symbol, &modules) {
            Some(output) => ToolResult::success(output),
            None => ToolResult::error(format!("No company profile found for '{}'", symbol)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_modules() -> Modules {
        serde_json::from_value(serde_json::json!({
            "assetProfile": {
                "sector": "Technology",
                "industry": "Semiconductors",
                "website": "https://www.nvidia.com",
                "city": "Santa Clara",
                "country": "United States",
                "fullTimeEmployees": 29600,
                "longBusinessSummary": "NVIDIA Corporation provides graphics and compute solutions."
            },
            "price": {
                "longName": "NVIDIA Corporation",
                "marketCap": {"raw": 3.2e12, "fmt": "3.2T"},
                "currency": "USD"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_format_profile() {
        let output = format_profile("NVDA", &make_modules()).unwrap();
        assert!(output.contains("**NVIDIA Corporation** (NVDA)"));
        assert!(output.contains("Sector: Technology / Semiconductors"));
        assert!(output.contains("HQ: Santa Clara, United States"));
        assert!(output.contains("Employees: 29600"));
        assert!(output.contains("Market Cap: 3.20T USD"));
        assert!(output.contains("graphics and compute solutions"));
    }

    #[test]
    fn test_format_profile_empty_is_none() {
        let modules = Modules::default();
        assert!(format_profile("NVDA", &modules).is_none());
    }

    #[test]
    fn test_truncate_summary() {
        let short = "Short summary.";
        assert_eq!(truncate_summary(short), short);

        let long = "x".repeat(SUMMARY_MAX_CHARS + 50);
        let truncated = truncate_summary(&long);
        assert!(truncated.chars().count() <= SUMMARY_MAX_CHARS + 1);
        assert!(truncated.ends_with('…'));
    }
}
