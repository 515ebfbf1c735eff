//! Yahoo Finance market-data tools
//!
//! One tool per concern: latest price, analyst recommendations, key
//! fundamentals, and the company profile. They share the quoteSummary
//! plumbing below.

pub mod company_info;
pub mod fundamentals;
pub mod recommendations;
pub mod stock_price;

use serde::Deserialize;
use serde_json::Value;

pub(crate) const QUOTE_SUMMARY_BASE: &str =
    "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
pub(crate) const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo reports most numbers as `{raw, fmt}` pairs; `fmt` is already
/// human-formatted ("1.23T", "4.56%").
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct YahooNum {
    pub raw: Option<f64>,
    pub fmt: Option<String>,
}

impl YahooNum {
    /// Display string: prefer the API's own formatting, fall back to raw.
    pub fn display(&self) -> Option<String> {
        if let Some(fmt) = &self.fmt {
            return Some(fmt.clone());
        }
        self.raw.map(|r| format!("{:.2}", r))
    }
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<Value>>,
    error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
struct YahooApiError {
    description: Option<String>,
}

pub(crate) fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Fetch one quoteSummary result object for the given modules.
pub(crate) async fn fetch_quote_summary(
    client: &reqwest::Client,
    symbol: &str,
    modules: &str,
) -> Result<Value, String> {
    let url = format!(
        "{}/{}?modules={}",
        QUOTE_SUMMARY_BASE,
        urlencoding::encode(symbol),
        modules
    );

    let resp = client
        .get(&url)
        .timeout(std::time::Duration::from_secs(15))
        .send()
        .await
        .map_err(|e| format!("Yahoo Finance request failed: {}", e))?;

    if !resp.status().is_success() {
        return Err(format!("Yahoo Finance API error: {}", resp.status()));
    }

    let envelope: QuoteSummaryEnvelope = resp
        .json()
        .await
        .map_err(|e| format!("Failed to parse Yahoo Finance response: {}", e))?;

    if let Some(error) = envelope.quote_summary.error {
        return Err(format!(
            "Yahoo Finance error for '{}': {}",
            symbol,
            error.description.unwrap_or_else(|| "unknown".to_string())
        ));
    }

    envelope
        .quote_summary
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| format!("No data returned for '{}'", symbol))
}

pub(crate) fn format_large_number(n: f64) -> String {
    if n.abs() >= 1_000_000_000_000.0 {
        format!("{:.2}T", n / 1_000_000_000_000.0)
    } else if n.abs() >= 1_000_000_000.0 {
        format!("{:.2}B", n / 1_000_000_000.0)
    } else if n.abs() >= 1_000_000.0 {
        format!("{:.2}M", n / 1_000_000.0)
    } else if n.abs() >= 1_000.0 {
        format!("{:.2}K", n / 1_000.0)
    } else {
        format!("{:.2}", n)
    }
}
