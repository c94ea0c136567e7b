//! News payloads and the feed producing them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FeedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// One news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,
    pub category: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// Source of news articles.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// Articles of one category; `"all"` for every category.
    async fn fetch_news(&self, category: &str) -> Result<Vec<NewsArticle>, FeedError>;

    async fn fetch_trending(&self) -> Result<Vec<NewsArticle>, FeedError>;
}
