//! Simulated feeds for development and demos.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;
use tracing::info;

use super::FeedError;
use super::market::{
    BollingerBands, ExtendedMarketData, Macd, MarketFeed, MarketSnapshot, MovingAverages,
    TechnicalIndicators,
};
use super::news::{NewsArticle, NewsFeed, Sentiment};

/// Artificial delay of each simulated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedLatency {
    pub snapshot: Duration,
    pub extended: Duration,
    pub news: Duration,
}

impl Default for FeedLatency {
    fn default() -> Self {
        Self {
            snapshot: Duration::from_millis(100),
            extended: Duration::from_millis(150),
            news: Duration::from_millis(200),
        }
    }
}

impl FeedLatency {
    /// Same delay for every call.
    pub fn uniform(latency: Duration) -> Self {
        Self {
            snapshot: latency,
            extended: latency,
            news: latency,
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }
}

async fn simulate(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// Market feed returning randomized prices around fixed baselines.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMarketFeed {
    latency: FeedLatency,
}

impl SimulatedMarketFeed {
    pub fn new(latency: FeedLatency) -> Self {
        Self { latency }
    }

    fn snapshot(asset_id: &str) -> MarketSnapshot {
        let mut rng = rand::thread_rng();
        MarketSnapshot {
            asset_id: asset_id.to_string(),
            price: 100.5 + rng.gen_range(0.0..10.0),
            volume_24h: 1_000_000.0 + rng.gen_range(0.0..100_000.0),
            market_cap: 1_000_000_000.0 + rng.gen_range(0.0..100_000_000.0),
            price_change_24h: -2.5 + rng.gen_range(0.0..5.0),
            timestamp: Utc::now(),
        }
    }

    fn indicators() -> TechnicalIndicators {
        let mut rng = rand::thread_rng();
        TechnicalIndicators {
            rsi: rng.gen_range(40.0..80.0),
            macd: Macd {
                value: rng.gen_range(-0.5..0.5),
                signal: rng.gen_range(-0.5..0.5),
                histogram: rng.gen_range(-0.5..0.5),
            },
            bollinger_bands: BollingerBands {
                upper: rng.gen_range(110.0..115.0),
                middle: rng.gen_range(100.0..105.0),
                lower: rng.gen_range(90.0..95.0),
            },
            moving_averages: MovingAverages {
                sma20: rng.gen_range(100.0..105.0),
                sma50: rng.gen_range(99.0..104.0),
                ema12: rng.gen_range(101.0..106.0),
            },
        }
    }
}

#[async_trait]
impl MarketFeed for SimulatedMarketFeed {
    async fn fetch_snapshot(&self, asset_id: &str) -> Result<MarketSnapshot, FeedError> {
        simulate(self.latency.snapshot).await;
        info!(asset_id = %asset_id, "Fetching market snapshot from upstream");
        Ok(Self::snapshot(asset_id))
    }

    async fn fetch_extended(&self, asset_id: &str) -> Result<ExtendedMarketData, FeedError> {
        simulate(self.latency.extended).await;
        info!(asset_id = %asset_id, "Fetching extended market data from upstream");
        Ok(ExtendedMarketData {
            snapshot: Self::snapshot(asset_id),
            indicators: Self::indicators(),
        })
    }
}

/// News feed returning two canned articles per category.
#[derive(Debug, Clone, Default)]
pub struct SimulatedNewsFeed {
    latency: FeedLatency,
}

impl SimulatedNewsFeed {
    pub fn new(latency: FeedLatency) -> Self {
        Self { latency }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[async_trait]
impl NewsFeed for SimulatedNewsFeed {
    async fn fetch_news(&self, category: &str) -> Result<Vec<NewsArticle>, FeedError> {
        simulate(self.latency.news).await;
        info!(category = %category, "Fetching news from upstream");

        let now = Utc::now();
        let title = capitalize(category);
        Ok(vec![
            NewsArticle {
                id: format!("{}-1", category),
                title: format!("{} News 1", title),
                description: "Latest developments in the crypto space".to_string(),
                source: "CryptoNews".to_string(),
                category: category.to_string(),
                url: format!("https://example.com/news/{}/1", category),
                image_url: Some("https://example.com/images/news-1.jpg".to_string()),
                published_at: now - ChronoDuration::hours(1),
                sentiment: Some(Sentiment::Positive),
            },
            NewsArticle {
                id: format!("{}-2", category),
                title: format!("{} News 2", title),
                description: "Market update on blockchain technology".to_string(),
                source: "CryptoNews".to_string(),
                category: category.to_string(),
                url: format!("https://example.com/news/{}/2", category),
                image_url: Some("https://example.com/images/news-2.jpg".to_string()),
                published_at: now - ChronoDuration::hours(2),
                sentiment: Some(Sentiment::Neutral),
            },
        ])
    }

    async fn fetch_trending(&self) -> Result<Vec<NewsArticle>, FeedError> {
        simulate(self.latency.news).await;
        info!("Fetching trending news from upstream");

        let now = Utc::now();
        Ok(vec![
            NewsArticle {
                id: "trending-1".to_string(),
                title: "Bitcoin Reaches New All-Time High".to_string(),
                description: "Cryptocurrency markets surge on positive regulatory news"
                    .to_string(),
                source: "CryptoNews".to_string(),
                category: "market-updates".to_string(),
                url: "https://example.com/news/trending/1".to_string(),
                image_url: Some("https://example.com/images/trending-1.jpg".to_string()),
                published_at: now,
                sentiment: Some(Sentiment::Positive),
            },
            NewsArticle {
                id: "trending-2".to_string(),
                title: "Stellar Ecosystem Expands".to_string(),
                description: "New partnerships announced for Stellar blockchain".to_string(),
                source: "Stellar Official".to_string(),
                category: "stellar-updates".to_string(),
                url: "https://example.com/news/trending/2".to_string(),
                image_url: Some("https://example.com/images/trending-2.jpg".to_string()),
                published_at: now - ChronoDuration::minutes(30),
                sentiment: Some(Sentiment::Positive),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_latency() {
        let latency = FeedLatency::default();
        assert_eq!(latency.snapshot, Duration::from_millis(100));
        assert_eq!(latency.extended, Duration::from_millis(150));
        assert_eq!(latency.news, Duration::from_millis(200));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("defi"), "Defi");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn test_snapshot_within_ranges() {
        let feed = SimulatedMarketFeed::new(FeedLatency::none());
        let snapshot = feed.fetch_snapshot("USD-STELLARA").await.unwrap();

        assert_eq!(snapshot.asset_id, "USD-STELLARA");
        assert!((100.5..110.5).contains(&snapshot.price));
        assert!((-2.5..2.5).contains(&snapshot.price_change_24h));
    }

    #[tokio::test]
    async fn test_extended_indicators_within_ranges() {
        let feed = SimulatedMarketFeed::new(FeedLatency::none());
        let data = feed.fetch_extended("XLM-USD").await.unwrap();

        assert_eq!(data.snapshot.asset_id, "XLM-USD");
        assert!((40.0..80.0).contains(&data.indicators.rsi));
        assert!(data.indicators.bollinger_bands.upper > data.indicators.bollinger_bands.lower);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let feed = SimulatedMarketFeed::default();
        let start = tokio::time::Instant::now();

        feed.fetch_snapshot("XLM-USD").await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_news_articles_per_category() {
        let feed = SimulatedNewsFeed::new(FeedLatency::none());
        let articles = feed.fetch_news("defi").await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "defi-1");
        assert_eq!(articles[0].title, "Defi News 1");
        assert!(articles.iter().all(|a| a.category == "defi"));
        assert!(articles[0].published_at > articles[1].published_at);
    }

    #[tokio::test]
    async fn test_trending_articles() {
        let feed = SimulatedNewsFeed::new(FeedLatency::none());
        let articles = feed.fetch_trending().await.unwrap();

        assert_eq!(articles[0].id, "trending-1");
        assert_eq!(articles[1].source, "Stellar Official");
    }
}
