//! News cache wrapper.

use std::fmt::Display;
use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use stellara_core::{CacheCategory, build_key};
use tracing::info;

use super::service::CacheService;

/// Category name meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Caches news listings per category and the trending list.
#[derive(Debug, Clone)]
pub struct NewsCache {
    cache: CacheService,
}

impl NewsCache {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Key of a category listing.
    ///
    /// `None` and `"all"` map to the bare news prefix.
    pub fn news_key(&self, category: Option<&str>) -> String {
        let entry = self.cache.registry().entry(CacheCategory::News);
        match category {
            Some(category) if category != ALL_CATEGORIES => {
                build_key(&entry.key_prefix, [category])
            },
            _ => entry.key_prefix.clone(),
        }
    }

    /// Key of the trending list.
    pub fn trending_key(&self) -> String {
        self.cache
            .registry()
            .entry(CacheCategory::NewsTrending)
            .key_prefix
            .clone()
    }

    /// Articles for a category, fetched through `provider` on a miss.
    pub async fn get_news<T, F, Fut, E>(&self, category: Option<&str>, provider: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ttl = self.cache.registry().entry(CacheCategory::News).ttl_seconds;
        self.cache
            .get_or_set(&self.news_key(category), provider, Some(ttl))
            .await
    }

    /// Trending articles, fetched through `provider` on a miss.
    pub async fn get_trending_news<T, F, Fut, E>(&self, provider: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ttl = self
            .cache
            .registry()
            .entry(CacheCategory::NewsTrending)
            .ttl_seconds;
        self.cache
            .get_or_set(&self.trending_key(), provider, Some(ttl))
            .await
    }

    /// Drops every news entry, including the all-categories listing.
    ///
    /// Unlike [`InvalidationService::clear_all_caches`], which only sweeps
    /// `cache:*` patterns, this also deletes the bare `cache:news` key.
    ///
    /// [`InvalidationService::clear_all_caches`]: super::InvalidationService::clear_all_caches
    pub async fn invalidate_news_cache(&self) {
        let all_key = self.news_key(None);
        let news_pattern = format!("{}:*", all_key);
        let trending_pattern = format!("{}:*", self.trending_key());

        let (news, trending, _) = tokio::join!(
            self.cache.delete_by_pattern(&news_pattern),
            self.cache.delete_by_pattern(&trending_pattern),
            // `cache:news:*` doesn't match the bare key
            self.cache.delete(&all_key),
        );

        info!(count = news + trending, "News cache invalidated");
    }

    /// Drops the listing of one category.
    pub async fn invalidate_news_category_cache(&self, category: &str) {
        self.cache.delete(&self.news_key(Some(category))).await;
        info!(category = %category, "News category cache invalidated");
    }

    /// Drops the trending list.
    pub async fn invalidate_trending_news(&self) {
        self.cache.delete(&self.trending_key()).await;
        info!("Trending news cache invalidated");
    }

    /// Cache service this wrapper delegates to.
    pub fn service(&self) -> &CacheService {
        &self.cache
    }
}
