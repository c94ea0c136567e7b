//! In-process store backed by Moka.
//!
//! Each entry carries its own TTL (via Moka's `Expiry`), so it behaves like
//! `SET`/`SETEX` on a real server. State is per process: use it for local
//! development and tests, never for multi-instance deployments.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use glob::Pattern;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Default maximum number of entries.
pub const DEFAULT_MEMORY_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
struct StoredValue {
    value: Arc<str>,
    ttl: Option<Duration>,
}

/// Expiry policy reading the TTL stored with each value.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    // An overwrite replaces the expiry entirely, like SET/SETEX.
    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// In-memory key-value store.
///
/// # Examples
///
/// ```
/// use stellara_store::{KeyValueStore, MemoryStore};
///
/// # #[tokio::main]
/// # async fn main() {
/// let store = MemoryStore::new(1_000);
/// store.set_with_expiry("cache:news:defi", "[]", 600).await.unwrap();
/// assert_eq!(store.get("cache:news:defi").await.unwrap().as_deref(), Some("[]"));
/// # }
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<String, StoredValue>,
}

impl MemoryStore {
    /// Creates a store holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        debug!(max_capacity = max_capacity, "Memory store created");

        Self { inner }
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Runs pending maintenance (expiry, eviction) immediately.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    async fn insert(&self, key: &str, value: &str, ttl: Option<Duration>) {
        self.inner
            .insert(
                key.to_string(),
                StoredValue {
                    value: Arc::from(value),
                    ttl,
                },
            )
            .await;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.inner.get(key).await.map(|v| v.value.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.insert(key, value, None).await;
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()> {
        self.insert(key, value, Some(Duration::from_secs(ttl_seconds.max(1))))
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> StoreResult<u64> {
        let mut deleted = 0;
        for key in keys {
            if self.inner.remove(key).await.is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let matcher =
            Pattern::new(pattern).map_err(|e| StoreError::invalid_pattern(pattern, e))?;

        let mut keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(key, _)| matcher.matches(key))
            .map(|(key, _)| (*key).clone())
            .collect();
        keys.sort();

        Ok(keys)
    }

    async fn server_info(&self) -> StoreResult<String> {
        Ok(format!(
            "# Server\r\nengine:moka\r\n# Keyspace\r\nentries:{}\r\nmax_capacity:{}\r\n",
            self.inner.entry_count(),
            self.inner.policy().max_capacity().unwrap_or_default()
        ))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
