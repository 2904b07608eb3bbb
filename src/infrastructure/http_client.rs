//! Outbound HTTP Client
//!
//! One shared reqwest client for every upstream call.

use std::time::Duration;

/// User agent sent to upstream services (ipapi.co rejects empty agents).
pub const USER_AGENT: &str = concat!("bedtime/", env!("CARGO_PKG_VERSION"));

/// Build the shared client with an explicit request timeout.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}
