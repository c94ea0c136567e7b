//! Upstream data feeds.
//!
//! A feed is what the cache layer calls on a miss. The shipped feeds are
//! simulated: they sleep for a configurable latency and return generated
//! payloads shaped like a real market-data or news provider.

pub mod market;
pub mod news;
pub mod simulated;

use thiserror::Error;

pub use market::{
    BollingerBands, ExtendedMarketData, Macd, MarketFeed, MarketSnapshot, MovingAverages,
    TechnicalIndicators,
};
pub use news::{NewsArticle, NewsFeed, Sentiment};
pub use simulated::{FeedLatency, SimulatedMarketFeed, SimulatedNewsFeed};

/// Upstream feed error.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The provider answered with an error.
    #[error("upstream '{provider}' failed: {reason}")]
    Upstream { provider: String, reason: String },

    /// The provider could not be reached.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

impl FeedError {
    pub fn upstream(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FeedError::upstream("coingecko", "HTTP 429");
        assert_eq!(err.to_string(), "upstream 'coingecko' failed: HTTP 429");

        let err = FeedError::unavailable("connection reset");
        assert!(err.to_string().contains("connection reset"));
    }
}
