//! Cache layer: the core service, per-domain wrappers and invalidation.
//!
//! - [`CacheService`]: get/set/get_or_set against a [`KeyValueStore`],
//!   TTL resolution and per-bucket hit/miss metrics
//! - [`MarketCache`] / [`NewsCache`]: key construction per domain
//! - [`InvalidationService`]: event dispatch to invalidation handlers
//!
//! [`KeyValueStore`]: stellara_store::KeyValueStore

pub mod invalidation;
pub mod market;
pub mod news;
pub mod service;

pub use invalidation::{
    AssetUpdateHandler, HandlerCounts, HandlerError, HandlerFn, InvalidationService,
    NewsUpdateHandler, handler_fn,
};
pub use market::MarketCache;
pub use news::{ALL_CATEGORIES, NewsCache};
pub use service::{CacheError, CacheService, REDIS_INFO_UNAVAILABLE};
