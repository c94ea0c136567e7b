//! Event-driven cache invalidation.
//!
//! Domain updates are turned into [`AssetUpdated`] / [`NewsUpdated`] events
//! and dispatched to an ordered list of handlers. The first handler of each
//! list is the built-in one registered at construction; more can be
//! appended at configuration time and are never removed.
//!
//! Dispatch is sequential in registration order. A failing handler is
//! logged and skipped; the remaining handlers still run and the emitter
//! never sees the error.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use stellara_core::{AssetUpdateKind, AssetUpdated, NewsUpdated, prefixes};
use tracing::{debug, error, info, warn};

use super::market::MarketCache;
use super::news::NewsCache;
use super::service::CacheService;

/// Error returned by an invalidation handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Reacts to an asset update.
#[async_trait]
pub trait AssetUpdateHandler: Send + Sync {
    async fn handle(&self, event: &AssetUpdated) -> Result<(), HandlerError>;
}

/// Reacts to a news update.
#[async_trait]
pub trait NewsUpdateHandler: Send + Sync {
    async fn handle(&self, event: &NewsUpdated) -> Result<(), HandlerError>;
}

/// Adapter turning an async closure into a handler. See [`handler_fn`].
pub struct HandlerFn<F>(F);

/// Wraps an async closure taking the event by value.
///
/// # Examples
///
/// ```no_run
/// # use stellara_server::cache::{InvalidationService, HandlerError, handler_fn};
/// # use stellara_core::AssetUpdated;
/// # fn register(invalidation: &InvalidationService) {
/// invalidation.on_asset_updated(handler_fn(|event: AssetUpdated| async move {
///     println!("asset {} changed", event.asset_id);
///     Ok::<(), HandlerError>(())
/// }));
/// # }
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> AssetUpdateHandler for HandlerFn<F>
where
    F: Fn(AssetUpdated) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, event: &AssetUpdated) -> Result<(), HandlerError> {
        (self.0)(event.clone()).await
    }
}

#[async_trait]
impl<F, Fut> NewsUpdateHandler for HandlerFn<F>
where
    F: Fn(NewsUpdated) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, event: &NewsUpdated) -> Result<(), HandlerError> {
        (self.0)(event.clone()).await
    }
}

/// Built-in asset handler.
struct MarketInvalidation {
    market: MarketCache,
}

#[async_trait]
impl AssetUpdateHandler for MarketInvalidation {
    async fn handle(&self, event: &AssetUpdated) -> Result<(), HandlerError> {
        info!(
            asset_id = %event.asset_id,
            kind = %event.kind,
            "Cache invalidation triggered for asset"
        );

        match event.kind {
            AssetUpdateKind::Price | AssetUpdateKind::Volume | AssetUpdateKind::All => {
                self.market.invalidate_market_cache(&event.asset_id).await;
            },
            AssetUpdateKind::Metadata => {
                self.market.invalidate_extended_data(&event.asset_id).await;
            },
        }
        Ok(())
    }
}

/// Built-in news handler.
struct NewsInvalidation {
    news: NewsCache,
}

#[async_trait]
impl NewsUpdateHandler for NewsInvalidation {
    async fn handle(&self, event: &NewsUpdated) -> Result<(), HandlerError> {
        info!(
            category = event.category.as_deref().unwrap_or("-"),
            trending = event.touches_trending(),
            "Cache invalidation triggered for news"
        );

        match event.category.as_deref() {
            Some(category) if !category.is_empty() => {
                self.news.invalidate_news_category_cache(category).await
            },
            _ => self.news.invalidate_news_cache().await,
        }

        if event.touches_trending() {
            self.news.invalidate_trending_news().await;
        }
        Ok(())
    }
}

/// Registered handler counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandlerCounts {
    pub asset: usize,
    pub news: usize,
}

/// Dispatches update events to invalidation handlers.
#[derive(Clone)]
pub struct InvalidationService {
    cache: CacheService,
    asset_handlers: Arc<RwLock<Vec<Arc<dyn AssetUpdateHandler>>>>,
    news_handlers: Arc<RwLock<Vec<Arc<dyn NewsUpdateHandler>>>>,
}

impl InvalidationService {
    /// Creates the service with the built-in handlers already registered.
    pub fn new(cache: CacheService, market: MarketCache, news: NewsCache) -> Self {
        let service = Self {
            cache,
            asset_handlers: Arc::new(RwLock::new(Vec::new())),
            news_handlers: Arc::new(RwLock::new(Vec::new())),
        };

        service.on_asset_updated(MarketInvalidation { market });
        service.on_news_updated(NewsInvalidation { news });
        service
    }

    /// Appends an asset handler after those already registered.
    pub fn on_asset_updated<H: AssetUpdateHandler + 'static>(&self, handler: H) {
        self.asset_handlers.write().push(Arc::new(handler));
    }

    /// Appends a news handler after those already registered.
    pub fn on_news_updated<H: NewsUpdateHandler + 'static>(&self, handler: H) {
        self.news_handlers.write().push(Arc::new(handler));
    }

    /// Runs every asset handler for an update of `asset_id`.
    pub async fn emit_asset_updated(&self, asset_id: &str, kind: AssetUpdateKind) {
        let event = AssetUpdated::new(asset_id, kind);
        let handlers: Vec<Arc<dyn AssetUpdateHandler>> = self.asset_handlers.read().clone();

        debug!(asset_id = %asset_id, kind = %kind, handlers = handlers.len(), "Emitting asset update");

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(e) = handler.handle(&event).await {
                error!(
                    asset_id = %asset_id,
                    handler = index,
                    error = %e,
                    "Error in asset update handler"
                );
            }
        }
    }

    /// Runs every news handler.
    pub async fn emit_news_updated(&self, category: Option<&str>, is_trending: Option<bool>) {
        let event = NewsUpdated::new(category.map(str::to_string), is_trending);
        let handlers: Vec<Arc<dyn NewsUpdateHandler>> = self.news_handlers.read().clone();

        debug!(handlers = handlers.len(), "Emitting news update");

        for (index, handler) in handlers.iter().enumerate() {
            if let Err(e) = handler.handle(&event).await {
                error!(handler = index, error = %e, "Error in news update handler");
            }
        }
    }

    /// Drops every market, news and metrics entry. Returns how many keys
    /// were deleted.
    pub async fn clear_all_caches(&self) -> u64 {
        warn!("Clearing all caches");

        let market = format!("{}:*", prefixes::MARKET);
        let news = format!("{}:*", prefixes::NEWS);
        let metrics = format!("{}:*", prefixes::METRICS);

        let (market, news, metrics) = tokio::join!(
            self.cache.delete_by_pattern(&market),
            self.cache.delete_by_pattern(&news),
            self.cache.delete_by_pattern(&metrics),
        );

        let total = market + news + metrics;
        info!(count = total, "All caches cleared");
        total
    }

    /// Number of registered handlers per event type.
    pub fn handler_counts(&self) -> HandlerCounts {
        HandlerCounts {
            asset: self.asset_handlers.read().len(),
            news: self.news_handlers.read().len(),
        }
    }
}

impl std::fmt::Debug for InvalidationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationService")
            .field("handlers", &self.handler_counts())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use stellara_core::TtlRegistry;
    use stellara_store::{KeyValueStore, MemoryStore};

    async fn setup() -> (InvalidationService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new(100));
        let cache = CacheService::new(store.clone(), TtlRegistry::default());
        let service = InvalidationService::new(
            cache.clone(),
            MarketCache::new(cache.clone()),
            NewsCache::new(cache),
        );

        for key in [
            "cache:market:snapshot:USD-STELLARA",
            "cache:market:snapshot:extended:USD-STELLARA",
            "cache:market:snapshot:XLM-USD",
            "cache:news",
            "cache:news:blockchain",
            "cache:news:defi",
            "cache:news:trending",
            "cache:metrics:daily",
        ] {
            store.set(key, "{}").await.unwrap();
        }
        (service, store)
    }

    async fn exists(store: &MemoryStore, key: &str) -> bool {
        store.get(key).await.unwrap().is_some()
    }

    #[tokio::test]
    async fn test_default_handlers_registered() {
        let (service, _) = setup().await;
        assert_eq!(service.handler_counts(), HandlerCounts { asset: 1, news: 1 });
    }

    #[tokio::test]
    async fn test_price_update_drops_both_market_keys() {
        let (service, store) = setup().await;

        service
            .emit_asset_updated("USD-STELLARA", AssetUpdateKind::Price)
            .await;

        assert!(!exists(&store, "cache:market:snapshot:USD-STELLARA").await);
        assert!(!exists(&store, "cache:market:snapshot:extended:USD-STELLARA").await);
        assert!(exists(&store, "cache:market:snapshot:XLM-USD").await);
    }

    #[tokio::test]
    async fn test_default_kind_is_all() {
        let (service, store) = setup().await;

        service
            .emit_asset_updated("USD-STELLARA", AssetUpdateKind::default())
            .await;

        assert!(!exists(&store, "cache:market:snapshot:USD-STELLARA").await);
        assert!(!exists(&store, "cache:market:snapshot:extended:USD-STELLARA").await);
    }

    #[tokio::test]
    async fn test_metadata_update_drops_only_extended() {
        let (service, store) = setup().await;

        service
            .emit_asset_updated("USD-STELLARA", AssetUpdateKind::Metadata)
            .await;

        assert!(exists(&store, "cache:market:snapshot:USD-STELLARA").await);
        assert!(!exists(&store, "cache:market:snapshot:extended:USD-STELLARA").await);
    }

    #[tokio::test]
    async fn test_news_category_and_trending() {
        let (service, store) = setup().await;

        service
            .emit_news_updated(Some("blockchain"), Some(true))
            .await;

        assert!(!exists(&store, "cache:news:blockchain").await);
        assert!(!exists(&store, "cache:news:trending").await);
        assert!(exists(&store, "cache:news:defi").await);
        assert!(exists(&store, "cache:news").await);
    }

    #[tokio::test]
    async fn test_news_without_category_drops_all_news() {
        let (service, store) = setup().await;

        service.emit_news_updated(None, None).await;

        for key in [
            "cache:news",
            "cache:news:blockchain",
            "cache:news:defi",
            "cache:news:trending",
        ] {
            assert!(!exists(&store, key).await, "{key} should be gone");
        }
        assert!(exists(&store, "cache:market:snapshot:XLM-USD").await);
    }

    #[tokio::test]
    async fn test_empty_news_category_drops_all_news() {
        let (service, store) = setup().await;

        service.emit_news_updated(Some(""), None).await;

        for key in ["cache:news", "cache:news:blockchain", "cache:news:defi"] {
            assert!(!exists(&store, key).await, "{key} should be gone");
        }
    }

    #[tokio::test]
    async fn test_handlers_run_in_order_and_failures_are_isolated() {
        let (service, _) = setup().await;
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        service.on_asset_updated(handler_fn(move |event: AssetUpdated| {
            let seen = Arc::clone(&first);
            async move {
                seen.lock().push(format!("first:{}", event.asset_id));
                Err::<(), HandlerError>("boom".into())
            }
        }));

        let second = Arc::clone(&seen);
        service.on_asset_updated(handler_fn(move |event: AssetUpdated| {
            let seen = Arc::clone(&second);
            async move {
                seen.lock().push(format!("second:{}", event.kind));
                Ok::<(), HandlerError>(())
            }
        }));

        service
            .emit_asset_updated("XLM-USD", AssetUpdateKind::Volume)
            .await;

        assert_eq!(*seen.lock(), vec!["first:XLM-USD", "second:volume"]);
        assert_eq!(service.handler_counts().asset, 3);
    }

    #[tokio::test]
    async fn test_custom_news_handler_receives_event() {
        let (service, _) = setup().await;
        let seen = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&seen);
        service.on_news_updated(handler_fn(move |event: NewsUpdated| {
            let slot = Arc::clone(&slot);
            async move {
                *slot.lock() = Some(event);
                Ok::<(), HandlerError>(())
            }
        }));

        service.emit_news_updated(Some("defi"), None).await;

        let event = seen.lock().clone().unwrap();
        assert_eq!(event.category.as_deref(), Some("defi"));
        assert!(!event.touches_trending());
    }

    #[tokio::test]
    async fn test_clear_all_caches() {
        let (service, store) = setup().await;

        let deleted = service.clear_all_caches().await;

        // cache:news is not matched by cache:news:*
        assert_eq!(deleted, 7);
        assert!(exists(&store, "cache:news").await);
        assert!(!exists(&store, "cache:metrics:daily").await);
    }
}
