//! Cache monitoring endpoints.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::metrics::BucketSnapshot;
use crate::state::AppState;

/// TTL and description of one registry category.
#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub ttl: u64,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct CacheInfoResponse {
    /// Raw diagnostic text from the store.
    pub redis: String,
    pub metrics: BTreeMap<String, BucketSnapshot>,
    /// Keyed by category name (`market_snapshot`, `news`, ...).
    pub config: BTreeMap<String, CategoryInfo>,
}

/// GET /api/cache/metrics
pub async fn get_cache_metrics(
    State(state): State<AppState>,
) -> Json<BTreeMap<String, BucketSnapshot>> {
    Json(state.cache().get_metrics())
}

/// GET /api/cache/info
pub async fn get_cache_info(State(state): State<AppState>) -> Json<CacheInfoResponse> {
    let cache = state.cache();
    let redis = cache.get_redis_info().await;

    let config = cache
        .registry()
        .entries()
        .iter()
        .map(|entry| {
            (
                entry.category.to_string(),
                CategoryInfo {
                    ttl: entry.ttl_seconds,
                    description: entry.description.clone(),
                },
            )
        })
        .collect();

    Json(CacheInfoResponse {
        redis,
        metrics: cache.get_metrics(),
        config,
    })
}
