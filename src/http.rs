use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// User agent sent on outbound API calls (DuckDuckGo, Google News, Yahoo Finance).
pub const USER_AGENT: &str = concat!("FinScout/", env!("CARGO_PKG_VERSION"));

/// Global shared HTTP client singleton.
///
/// One connection pool for every outbound request in the application.
/// `Client::clone()` is just an `Arc` increment, so callers clone freely.
/// Callers that need a tighter timeout override it per-request via `.timeout()`.
static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(60))
        .timeout(Duration::from_secs(120))
        .build()
        .expect("Failed to create shared HTTP client")
});

/// Returns a reference to the global shared HTTP client.
pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}
