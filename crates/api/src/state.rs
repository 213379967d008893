use std::sync::Arc;

use crate::cache::TtlCache;
use crate::config::ServerConfig;
use crate::handlers::listings::HomeFeed;
use crate::middleware::rate_limit::RateLimitState;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: autobazaar_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Process-wide cache for the home feed.
    pub home_feed: Arc<TtlCache<HomeFeed>>,
    /// Per-client request buckets.
    pub rate_limit: Arc<RateLimitState>,
}

impl AppState {
    pub fn new(pool: autobazaar_db::DbPool, config: ServerConfig) -> Self {
        let home_feed = Arc::new(TtlCache::new(
            "home",
            std::time::Duration::from_secs(config.home_feed_ttl_secs),
        ));
        let rate_limit = Arc::new(RateLimitState::new(config.rate_limit));
        Self {
            pool,
            config: Arc::new(config),
            home_feed,
            rate_limit,
        }
    }
}
