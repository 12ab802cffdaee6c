pub mod gemini;
pub mod gnews;

use std::time::Duration;

/// Build a shared HTTP client for the external APIs.
/// Per-request timeouts come from each client's config section.
pub fn build_shared_http_client(connect_timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_seconds))
        .user_agent(concat!("NewsPulse/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}
