//! # Stellara Store
//!
//! Key-value store adapters for the Stellara cache layer.
//!
//! The cache service only sees the [`KeyValueStore`] trait: string values,
//! optional per-key expiry, glob-style key listing and batch deletes. Two
//! adapters are provided:
//!
//! - [`RedisStore`] - production store over a multiplexed Redis connection
//! - [`MemoryStore`] - in-process store with per-entry TTL, for development
//!   and tests
//!
//! ## Example
//!
//! ```ignore
//! use stellara_store::{KeyValueStore, RedisStore};
//!
//! let store = RedisStore::connect("redis://127.0.0.1:6379").await?;
//! store.set_with_expiry("cache:news:defi", "[]", 600).await?;
//! let keys = store.keys_matching("cache:news:*").await?;
//! ```

pub mod error;
pub mod memory;
pub mod redis_store;
pub mod traits;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use memory::{DEFAULT_MEMORY_CAPACITY, MemoryStore};
pub use redis_store::RedisStore;
pub use traits::KeyValueStore;

// Re-export async_trait so implementors don't need their own dependency
pub use async_trait::async_trait;
