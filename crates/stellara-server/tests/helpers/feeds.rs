//! Feeds that always fail.

use stellara_server::feeds::{
    ExtendedMarketData, FeedError, MarketFeed, MarketSnapshot, NewsArticle, NewsFeed,
};
use stellara_store::async_trait;

pub struct FailingMarketFeed;

#[async_trait]
impl MarketFeed for FailingMarketFeed {
    async fn fetch_snapshot(&self, _asset_id: &str) -> Result<MarketSnapshot, FeedError> {
        Err(FeedError::upstream("test", "HTTP 503"))
    }

    async fn fetch_extended(&self, _asset_id: &str) -> Result<ExtendedMarketData, FeedError> {
        Err(FeedError::unavailable("connection refused"))
    }
}

pub struct FailingNewsFeed;

#[async_trait]
impl NewsFeed for FailingNewsFeed {
    async fn fetch_news(&self, _category: &str) -> Result<Vec<NewsArticle>, FeedError> {
        Err(FeedError::unavailable("connection refused"))
    }

    async fn fetch_trending(&self) -> Result<Vec<NewsArticle>, FeedError> {
        Err(FeedError::upstream("test", "HTTP 500"))
    }
}
