use std::sync::Arc;

use crate::cache::MarketCache;
use crate::feeds::{ExtendedMarketData, FeedError, MarketFeed, MarketSnapshot};

/// Market data served from cache, falling back to the feed.
#[derive(Clone)]
pub struct MarketApi {
    cache: MarketCache,
    feed: Arc<dyn MarketFeed>,
}

impl MarketApi {
    pub fn new(cache: MarketCache, feed: Arc<dyn MarketFeed>) -> Self {
        Self { cache, feed }
    }

    pub async fn get_market_snapshot(&self, asset_id: &str) -> Result<MarketSnapshot, FeedError> {
        self.cache
            .get_market_snapshot(asset_id, || self.feed.fetch_snapshot(asset_id))
            .await
    }

    pub async fn get_extended_market_data(
        &self,
        asset_id: &str,
    ) -> Result<ExtendedMarketData, FeedError> {
        self.cache
            .get_extended_market_data(asset_id, || self.feed.fetch_extended(asset_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheService;
    use crate::feeds::{FeedLatency, SimulatedMarketFeed};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use stellara_core::TtlRegistry;
    use stellara_store::MemoryStore;

    /// Counts upstream calls.
    struct CountingFeed {
        calls: AtomicU32,
        inner: SimulatedMarketFeed,
    }

    impl CountingFeed {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                inner: SimulatedMarketFeed::new(FeedLatency::none()),
            }
        }
    }

    #[async_trait]
    impl MarketFeed for CountingFeed {
        async fn fetch_snapshot(&self, asset_id: &str) -> Result<MarketSnapshot, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_snapshot(asset_id).await
        }

        async fn fetch_extended(&self, asset_id: &str) -> Result<ExtendedMarketData, FeedError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_extended(asset_id).await
        }
    }

    struct DownFeed;

    #[async_trait]
    impl MarketFeed for DownFeed {
        async fn fetch_snapshot(&self, _asset_id: &str) -> Result<MarketSnapshot, FeedError> {
            Err(FeedError::unavailable("connection reset"))
        }

        async fn fetch_extended(&self, _asset_id: &str) -> Result<ExtendedMarketData, FeedError> {
            Err(FeedError::upstream("simulated", "HTTP 503"))
        }
    }

    fn market_cache() -> MarketCache {
        MarketCache::new(CacheService::new(
            Arc::new(MemoryStore::new(100)),
            TtlRegistry::default(),
        ))
    }

    #[tokio::test]
    async fn test_snapshot_is_served_from_cache_second_time() {
        let feed = Arc::new(CountingFeed::new());
        let api = MarketApi::new(market_cache(), feed.clone());

        let first = api.get_market_snapshot("USD-STELLARA").await.unwrap();
        let second = api.get_market_snapshot("USD-STELLARA").await.unwrap();

        assert_eq!(first.asset_id, "USD-STELLARA");
        assert_eq!(first.timestamp, second.timestamp);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_feed_error_propagates() {
        let api = MarketApi::new(market_cache(), Arc::new(DownFeed));

        let err = api.get_market_snapshot("USD-STELLARA").await.unwrap_err();
        assert!(matches!(err, FeedError::Unavailable(_)));

        let err = api.get_extended_market_data("USD-STELLARA").await.unwrap_err();
        assert!(matches!(err, FeedError::Upstream { .. }));
    }
}
