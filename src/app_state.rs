// =============================================================================
// Shared Application State
// =============================================================================
//
// Built once in main and handed to the router behind an `Arc`.  Ties the
// resolved configuration, the market-data client, and the response cache
// together; the only mutable piece is the cache, which manages its own
// interior lock.

use std::time::Duration;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::yahoo::HistoryClient;

/// Central application state shared across handlers via `Arc<AppState>`.
pub struct AppState {
    pub config: Config,
    pub history: HistoryClient,
    pub cache: ResponseCache,
}

impl AppState {
    /// Construct the shared state from the resolved configuration.
    pub fn new(config: Config) -> Self {
        let history = HistoryClient::new(config.provider_base_url.clone(), config.http_timeout_secs);
        let cache = ResponseCache::new(Duration::from_secs(config.cache_ttl_secs));
        Self {
            config,
            history,
            cache,
        }
    }
}
