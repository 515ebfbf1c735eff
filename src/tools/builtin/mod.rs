pub mod duckduckgo;
pub mod finance;
pub mod news;

pub use duckduckgo::DuckDuckGoSearchTool;
pub use finance::company_info::CompanyInfoTool;
pub use finance::fundamentals::StockFundamentalsTool;
pub use finance::recommendations::AnalystRecommendationsTool;
pub use finance::stock_price::StockPriceTool;
pub use news::NewsSearchTool;
