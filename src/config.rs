use crate::adapters::outbound::{DEFAULT_GEO_API_URL, DEFAULT_LOCATION_TTL, DEFAULT_SUNRISE_API_URL};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub listen_addr: String,
    pub debug: bool,
    pub cors_enabled: bool,

    // Upstream APIs
    pub geo_api_url: String,
    pub sunrise_api_url: String,
    pub upstream_timeout_secs: u64,

    // Location cache
    pub location_cache_ttl_secs: u64,
    /// 0 disables the background sweeper; expiry still happens on read.
    pub cache_sweep_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            debug: false,
            cors_enabled: true,
            geo_api_url: DEFAULT_GEO_API_URL.to_string(),
            sunrise_api_url: DEFAULT_SUNRISE_API_URL.to_string(),
            upstream_timeout_secs: 10,
            location_cache_ttl_secs: DEFAULT_LOCATION_TTL.as_secs(),
            cache_sweep_interval_secs: 3_600,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Build the config from an arbitrary variable lookup.
pub fn load_config_from<F>(lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let listen_addr = lookup("BEDTIME_LISTEN_ADDR").unwrap_or(defaults.listen_addr);

    let debug = lookup("DEBUG").is_some();

    let cors_enabled = lookup("BEDTIME_CORS_ENABLED")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(defaults.cors_enabled);

    let geo_api_url = lookup("BEDTIME_GEO_API_URL").unwrap_or(defaults.geo_api_url);

    let sunrise_api_url = lookup("BEDTIME_SUNRISE_API_URL").unwrap_or(defaults.sunrise_api_url);

    let upstream_timeout_secs = lookup("BEDTIME_UPSTREAM_TIMEOUT_SECS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.upstream_timeout_secs);

    let location_cache_ttl_secs = lookup("BEDTIME_LOCATION_CACHE_TTL_SECS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.location_cache_ttl_secs);

    let cache_sweep_interval_secs = lookup("BEDTIME_CACHE_SWEEP_INTERVAL_SECS")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.cache_sweep_interval_secs);

    Ok(Config {
        listen_addr,
        debug,
        cors_enabled,
        geo_api_url,
        sunrise_api_url,
        upstream_timeout_secs,
        location_cache_ttl_secs,
        cache_sweep_interval_secs,
    })
}
