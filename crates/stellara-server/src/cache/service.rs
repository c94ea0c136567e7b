//! Cache service over a key-value store.
//!
//! The service never lets a store problem reach the caller: a failed read
//! is a miss, a failed write or delete is a no-op, a failed pattern delete
//! deletes nothing. The only error that crosses this boundary is the one
//! returned by a provider inside [`CacheService::get_or_set`].

use std::collections::BTreeMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde::de::DeserializeOwned;
use stellara_core::TtlRegistry;
use stellara_store::{KeyValueStore, StoreError};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::metrics::{BucketSnapshot, CacheMetrics};

/// Returned by [`CacheService::get_redis_info`] when the store can't be queried.
pub const REDIS_INFO_UNAVAILABLE: &str = "Unable to fetch Redis info";

/// Cache service error.
///
/// Only produced internally; the public operations turn it into a
/// fallback value after logging it.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Cache service with per-bucket hit/miss metrics.
///
/// Cloning is cheap; clones share the store, registry and metrics.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use stellara_core::TtlRegistry;
/// use stellara_server::cache::CacheService;
/// use stellara_store::MemoryStore;
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = CacheService::new(Arc::new(MemoryStore::default()), TtlRegistry::default());
///
/// let price: Result<f64, std::io::Error> = cache
///     .get_or_set("cache:market:snapshot:XLM-USD", || async { Ok(0.12) }, None)
///     .await;
/// # }
/// ```
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<TtlRegistry>,
    metrics: CacheMetrics,
}

impl CacheService {
    /// Creates the service with one metrics bucket per registry prefix.
    pub fn new(store: Arc<dyn KeyValueStore>, registry: TtlRegistry) -> Self {
        let metrics = CacheMetrics::new(registry.bucket_names());
        Self {
            store,
            registry: Arc::new(registry),
            metrics,
        }
    }

    /// Reads and deserializes a cached value.
    ///
    /// Returns `None` on a miss, and also when the store fails or the stored
    /// payload doesn't deserialize; both count as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let start = Instant::now();
        let bucket = self.find_matching_config_prefix(key);

        let result = match self.try_get(key).await {
            Ok(Some(value)) => {
                self.metrics.record_hit(&bucket);
                debug!(key = %key, "Cache hit");
                Some(value)
            },
            Ok(None) => {
                self.metrics.record_miss(&bucket);
                debug!(key = %key, "Cache miss");
                None
            },
            Err(e) => {
                error!(key = %key, error = %e, "Error getting cache key");
                self.metrics.record_store_error("get");
                self.metrics.record_miss(&bucket);
                None
            },
        };

        self.metrics
            .record_operation_duration("get", start.elapsed());
        result
    }

    async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serializes and stores a value.
    ///
    /// `ttl_seconds` wins when given; otherwise the TTL comes from the
    /// registry entry matching the key. A TTL of `0` stores without expiry.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) {
        let ttl = ttl_seconds.unwrap_or_else(|| self.registry.ttl_for(key));

        if let Err(e) = self.try_set(key, value, ttl).await {
            error!(key = %key, error = %e, "Error setting cache key");
            self.metrics.record_store_error("set");
        }
    }

    async fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: u64,
    ) -> Result<(), CacheError> {
        let serialized = serde_json::to_string(value)?;

        if ttl > 0 {
            self.store.set_with_expiry(key, &serialized, ttl).await?;
            debug!(key = %key, ttl = ttl, "Cached key");
        } else {
            self.store.set(key, &serialized).await?;
            debug!(key = %key, "Cached key (no expiration)");
        }
        Ok(())
    }

    /// Cache-aside read: returns the cached value, or runs `provider`,
    /// caches its result and returns it.
    ///
    /// A provider error is returned unchanged and nothing is cached.
    /// Concurrent misses on the same key each run their own provider.
    pub async fn get_or_set<T, F, Fut, E>(
        &self,
        key: &str,
        provider: F,
        ttl_seconds: Option<u64>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if let Some(cached) = self.get(key).await {
            return Ok(cached);
        }

        let start = Instant::now();
        let value = provider().await.map_err(|e| {
            error!(key = %key, error = %e, "Error in get_or_set provider");
            e
        })?;
        self.metrics
            .record_operation_duration("provider", start.elapsed());

        self.set(key, &value, ttl_seconds).await;
        Ok(value)
    }

    /// Deletes one key. Failures are logged and ignored.
    pub async fn delete(&self, key: &str) {
        match self.store.delete(key).await {
            Ok(()) => debug!(key = %key, "Deleted cache key"),
            Err(e) => {
                error!(key = %key, error = %e, "Error deleting cache key");
                self.metrics.record_store_error("delete");
            },
        }
    }

    /// Deletes every key matching a glob pattern and returns how many were
    /// deleted. Returns `0` when nothing matches or the store fails.
    pub async fn delete_by_pattern(&self, pattern: &str) -> u64 {
        match self.try_delete_by_pattern(pattern).await {
            Ok(deleted) => deleted,
            Err(e) => {
                error!(pattern = %pattern, error = %e, "Error deleting cache keys by pattern");
                self.metrics.record_store_error("delete_by_pattern");
                0
            },
        }
    }

    async fn try_delete_by_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let keys = self.store.keys_matching(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        let deleted = self.store.delete_many(&keys).await?;
        debug!(pattern = %pattern, count = deleted, "Deleted cache keys matching pattern");
        Ok(deleted)
    }

    /// Drops every entry mentioning an entity, across all domains.
    ///
    /// Uses `cache:*:<type>:<id>:*`, or `cache:*:<type>:*` without an id.
    pub async fn invalidate_entity_cache(&self, entity_type: &str, entity_id: Option<&str>) -> u64 {
        let pattern = match entity_id {
            Some(id) => format!("cache:*:{}:{}:*", entity_type, id),
            None => format!("cache:*:{}:*", entity_type),
        };

        let deleted = self.delete_by_pattern(&pattern).await;
        info!(
            entity_type = %entity_type,
            entity_id = entity_id.unwrap_or("-"),
            count = deleted,
            "Invalidated entity cache entries"
        );
        deleted
    }

    /// Hit/miss snapshot per bucket.
    pub fn get_metrics(&self) -> BTreeMap<String, BucketSnapshot> {
        self.metrics.snapshot()
    }

    /// Zeroes every bucket.
    pub fn clear_metrics(&self) {
        self.metrics.reset();
        debug!("Cache metrics cleared");
    }

    /// Diagnostic text from the store, or [`REDIS_INFO_UNAVAILABLE`].
    pub async fn get_redis_info(&self) -> String {
        match self.store.server_info().await {
            Ok(info) => info,
            Err(e) => {
                error!(store = self.store.name(), error = %e, "Error fetching store info");
                REDIS_INFO_UNAVAILABLE.to_string()
            },
        }
    }

    /// Metrics bucket a key counts against.
    ///
    /// Same longest-prefix lookup the TTL resolution uses; keys outside the
    /// registry fall back to their own first two segments.
    pub fn find_matching_config_prefix(&self, key: &str) -> String {
        self.registry.bucket_for(key)
    }

    /// Registry used for TTL and bucket resolution.
    pub fn registry(&self) -> &TtlRegistry {
        &self.registry
    }

    /// Metrics recorder shared by all clones.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Name of the underlying store.
    pub fn store_name(&self) -> &str {
        self.store.name()
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("store", &self.store.name())
            .field("buckets", &self.registry.bucket_names())
            .finish()
    }
}
