//! Market data payloads and the feed producing them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FeedError;

/// Price and volume for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub asset_id: String,
    pub price: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub market_cap: f64,
    #[serde(rename = "priceChange24h")]
    pub price_change_24h: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub value: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub sma20: f64,
    pub sma50: f64,
    pub ema12: f64,
}

/// Technical indicators computed for an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd: Macd,
    pub bollinger_bands: BollingerBands,
    pub moving_averages: MovingAverages,
}

/// Snapshot plus technical indicators, serialized as one flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedMarketData {
    #[serde(flatten)]
    pub snapshot: MarketSnapshot,
    #[serde(flatten)]
    pub indicators: TechnicalIndicators,
}

/// Source of market data.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    async fn fetch_snapshot(&self, asset_id: &str) -> Result<MarketSnapshot, FeedError>;

    async fn fetch_extended(&self, asset_id: &str) -> Result<ExtendedMarketData, FeedError>;
}
