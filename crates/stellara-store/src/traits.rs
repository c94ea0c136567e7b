//! Key-value store trait definition.

use async_trait::async_trait;

use crate::error::StoreResult;

/// A network-backed (or in-process) key-value store.
///
/// This trait abstracts over the concrete store so the cache service can
/// run against Redis in production and an in-memory store in development
/// and tests. Values are opaque strings; serialization is the caller's
/// concern.
///
/// # Implementors
///
/// - `RedisStore` - Redis (or any RESP-compatible server)
/// - `MemoryStore` - In-process store backed by Moka
///
/// # Example
///
/// ```ignore
/// use stellara_store::{KeyValueStore, StoreResult};
///
/// struct NullStore;
///
/// #[async_trait]
/// impl KeyValueStore for NullStore {
///     async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
///         Ok(None)
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a key.
    ///
    /// Returns `Ok(None)` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes a key without expiry.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes a key that expires after `ttl_seconds`.
    ///
    /// Callers never pass `0`; a zero TTL means "no expiry" and goes
    /// through [`KeyValueStore::set`] instead.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> StoreResult<()>;

    /// Deletes a single key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Deletes a batch of keys and returns how many existed.
    async fn delete_many(&self, keys: &[String]) -> StoreResult<u64>;

    /// Lists keys matching a glob-style pattern (`*`, `?`, `[...]`).
    async fn keys_matching(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Returns a diagnostic description of the server.
    async fn server_info(&self) -> StoreResult<String>;

    /// Returns the name of this store, for logging.
    fn name(&self) -> &str;
}
