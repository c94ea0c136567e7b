use std::sync::Arc;

use crate::cache::{ALL_CATEGORIES, NewsCache};
use crate::feeds::{FeedError, NewsArticle, NewsFeed};

/// News served from cache, falling back to the feed.
#[derive(Clone)]
pub struct NewsApi {
    cache: NewsCache,
    feed: Arc<dyn NewsFeed>,
}

impl NewsApi {
    pub fn new(cache: NewsCache, feed: Arc<dyn NewsFeed>) -> Self {
        Self { cache, feed }
    }

    /// Articles of a category; `None` means every category.
    pub async fn get_news(&self, category: Option<&str>) -> Result<Vec<NewsArticle>, FeedError> {
        let category = category.unwrap_or(ALL_CATEGORIES);
        self.cache
            .get_news(Some(category), || self.feed.fetch_news(category))
            .await
    }

    pub async fn get_trending_news(&self) -> Result<Vec<NewsArticle>, FeedError> {
        self.cache
            .get_trending_news(|| self.feed.fetch_trending())
            .await
    }
}
