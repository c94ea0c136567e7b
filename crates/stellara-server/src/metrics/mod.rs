//! Metrics module for the Stellara cache server.

pub mod cache;
pub mod http;
pub mod setup;

pub use cache::{BucketSnapshot, CacheMetrics};
pub use setup::init_metrics;
