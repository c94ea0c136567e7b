//! Cache metrics recording.
//!
//! Hits and misses are kept per bucket (a simplified key prefix such as
//! `cache:market`) so they can be reported through the metrics endpoint,
//! and are mirrored to the global `metrics` recorder for Prometheus.

use metrics::{counter, histogram};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Describes the cache metrics to the global recorder.
/// Call once at startup.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "stellara_cache_hits_total",
        "Total number of cache hits per bucket"
    );
    metrics::describe_counter!(
        "stellara_cache_misses_total",
        "Total number of cache misses per bucket"
    );
    metrics::describe_counter!(
        "stellara_cache_store_errors_total",
        "Store failures absorbed by the cache service"
    );
    metrics::describe_histogram!(
        "stellara_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

#[derive(Debug, Default)]
struct BucketCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl BucketCounters {
    fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time view of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSnapshot {
    pub hits: u64,
    pub misses: u64,
    /// Percentage in `0.0..=100.0`; `0.0` when there were no requests.
    pub hit_rate: f64,
    pub total_requests: u64,
}

impl BucketSnapshot {
    fn new(hits: u64, misses: u64) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64 * 100.0
        };
        Self {
            hits,
            misses,
            hit_rate,
            total_requests: total,
        }
    }
}

/// Per-bucket cache metrics.
///
/// Existing buckets are bumped under a read lock with atomic counters;
/// the write lock is only taken to create an ad hoc bucket.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    buckets: Arc<RwLock<BTreeMap<String, Arc<BucketCounters>>>>,
    seed: Arc<[String]>,
}

impl CacheMetrics {
    /// Creates one zeroed bucket per name in `seed`.
    pub fn new(seed: Vec<String>) -> Self {
        let buckets = seed
            .iter()
            .map(|name| (name.clone(), Arc::new(BucketCounters::default())))
            .collect();
        Self {
            buckets: Arc::new(RwLock::new(buckets)),
            seed: seed.into(),
        }
    }

    fn counters(&self, bucket: &str) -> Arc<BucketCounters> {
        if let Some(counters) = self.buckets.read().get(bucket) {
            return Arc::clone(counters);
        }
        let mut buckets = self.buckets.write();
        Arc::clone(buckets.entry(bucket.to_string()).or_default())
    }

    /// Records a cache hit.
    pub fn record_hit(&self, bucket: &str) {
        self.counters(bucket).hits.fetch_add(1, Ordering::Relaxed);
        counter!("stellara_cache_hits_total", "bucket" => bucket.to_string()).increment(1);
    }

    /// Records a cache miss.
    pub fn record_miss(&self, bucket: &str) {
        self.counters(bucket).misses.fetch_add(1, Ordering::Relaxed);
        counter!("stellara_cache_misses_total", "bucket" => bucket.to_string()).increment(1);
    }

    /// Records a store failure the cache absorbed.
    pub fn record_store_error(&self, operation: &'static str) {
        counter!("stellara_cache_store_errors_total", "operation" => operation).increment(1);
    }

    /// Records how long an operation took.
    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("stellara_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Snapshot of every bucket. Later recordings do not affect it.
    pub fn snapshot(&self) -> BTreeMap<String, BucketSnapshot> {
        self.buckets
            .read()
            .iter()
            .map(|(name, c)| {
                (
                    name.clone(),
                    BucketSnapshot::new(
                        c.hits.load(Ordering::Relaxed),
                        c.misses.load(Ordering::Relaxed),
                    ),
                )
            })
            .collect()
    }

    /// Zeroes every bucket and re-seeds any missing registry bucket.
    pub fn reset(&self) {
        let mut buckets = self.buckets.write();
        for counters in buckets.values() {
            counters.reset();
        }
        for name in self.seed.iter() {
            buckets.entry(name.clone()).or_default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> CacheMetrics {
        CacheMetrics::new(vec!["cache:market".to_string(), "cache:news".to_string()])
    }

    #[test]
    fn test_seeded_buckets_start_at_zero() {
        let snapshot = metrics().snapshot();

        assert_eq!(snapshot.len(), 2);
        let market = snapshot["cache:market"];
        assert_eq!(market.hits, 0);
        assert_eq!(market.misses, 0);
        assert_eq!(market.total_requests, 0);
        assert_eq!(market.hit_rate, 0.0);
    }

    #[test]
    fn test_bucket_hit_rate() {
        let metrics = metrics();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_hit("cache:market");
        metrics.record_hit("cache:market");
        metrics.record_hit("cache:market");
        metrics.record_miss("cache:market");

        let market = metrics.snapshot()["cache:market"];
        assert_eq!(market.total_requests, 4);
        assert!((market.hit_rate - 75.0).abs() < 0.001);
        assert_eq!(metrics.snapshot()["cache:news"].hits, 0);
    }

    #[test]
    fn test_ad_hoc_bucket_is_created() {
        let metrics = metrics();
        metrics.record_miss("session:user");

        assert_eq!(metrics.snapshot()["session:user"].misses, 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let metrics = metrics();
        let before = metrics.snapshot();
        metrics.record_hit("cache:news");

        assert_eq!(before["cache:news"].hits, 0);
        assert_eq!(metrics.snapshot()["cache:news"].hits, 1);
    }

    #[test]
    fn test_reset_keeps_bucket_names() {
        let metrics = metrics();
        metrics.record_hit("cache:market");
        metrics.record_miss("session:user");

        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.len(), 3);
        for bucket in snapshot.values() {
            assert_eq!(*bucket, BucketSnapshot::new(0, 0));
        }
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(BucketSnapshot::new(3, 1)).unwrap();
        assert_eq!(json["hitRate"], 75.0);
        assert_eq!(json["totalRequests"], 4);
    }
}
