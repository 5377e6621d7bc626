// =============================================================================
// Service configuration, read once from the environment at startup
// =============================================================================
//
// Every knob has a default so the service starts with no environment at all.
// An unparsable numeric value falls back to its default with a warning
// instead of aborting startup.

use tracing::warn;

/// Default TCP bind address for the REST API.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
/// Default base URL of the market-data chart endpoint.
const DEFAULT_PROVIDER_BASE_URL: &str = "https://query1.finance.yahoo.com";
/// Default provider request timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
/// Default response-cache entry lifetime in seconds.
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the REST API listens on (`ANALYTICS_BIND_ADDR`).
    pub bind_addr: String,
    /// Base URL of the market-data provider, no trailing slash
    /// (`ANALYTICS_PROVIDER_URL`).
    pub provider_base_url: String,
    /// Provider request timeout in seconds (`ANALYTICS_HTTP_TIMEOUT_SECS`).
    pub http_timeout_secs: u64,
    /// Response-cache entry lifetime in seconds (`ANALYTICS_CACHE_TTL_SECS`).
    pub cache_ttl_secs: u64,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("ANALYTICS_BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            provider_base_url: std::env::var("ANALYTICS_PROVIDER_URL")
                .unwrap_or_else(|_| DEFAULT_PROVIDER_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            http_timeout_secs: env_u64("ANALYTICS_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
            cache_ttl_secs: env_u64("ANALYTICS_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            provider_base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Read a `u64` environment variable, falling back to `default` when the
/// variable is missing or unparsable.
fn env_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, default, "unparsable numeric env var, using default");
            default
        }),
        Err(_) => default,
    }
}
