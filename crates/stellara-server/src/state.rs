//! Application state.

use std::sync::Arc;

use stellara_core::TtlRegistry;
use stellara_store::KeyValueStore;

use crate::api::{MarketApi, NewsApi};
use crate::cache::{CacheService, InvalidationService, MarketCache, NewsCache};
use crate::feeds::{FeedLatency, MarketFeed, NewsFeed, SimulatedMarketFeed, SimulatedNewsFeed};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    cache: CacheService,
    market: MarketApi,
    news: NewsApi,
    invalidation: InvalidationService,
}

impl AppState {
    /// Wires the cache layer over `store` and the given feeds.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        registry: TtlRegistry,
        market_feed: Arc<dyn MarketFeed>,
        news_feed: Arc<dyn NewsFeed>,
    ) -> Self {
        let cache = CacheService::new(store, registry);
        let market_cache = MarketCache::new(cache.clone());
        let news_cache = NewsCache::new(cache.clone());

        let invalidation =
            InvalidationService::new(cache.clone(), market_cache.clone(), news_cache.clone());

        Self {
            market: MarketApi::new(market_cache, market_feed),
            news: NewsApi::new(news_cache, news_feed),
            invalidation,
            cache,
        }
    }

    /// Same as [`AppState::new`] with the simulated feeds.
    pub fn with_simulated_feeds(
        store: Arc<dyn KeyValueStore>,
        registry: TtlRegistry,
        latency: FeedLatency,
    ) -> Self {
        Self::new(
            store,
            registry,
            Arc::new(SimulatedMarketFeed::new(latency)),
            Arc::new(SimulatedNewsFeed::new(latency)),
        )
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    pub fn market(&self) -> &MarketApi {
        &self.market
    }

    pub fn news(&self) -> &NewsApi {
        &self.news
    }

    /// Invalidation dispatcher for in-process producers of update events.
    pub fn invalidation(&self) -> &InvalidationService {
        &self.invalidation
    }
}
