//! Market data cache wrapper.

use std::fmt::Display;
use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use stellara_core::{CacheCategory, build_key};
use tracing::info;

use super::service::CacheService;

/// Caches market snapshots and extended market data per asset.
#[derive(Debug, Clone)]
pub struct MarketCache {
    cache: CacheService,
}

impl MarketCache {
    pub fn new(cache: CacheService) -> Self {
        Self { cache }
    }

    /// Key of the price/volume snapshot for an asset.
    pub fn snapshot_key(&self, asset_id: &str) -> String {
        let entry = self.cache.registry().entry(CacheCategory::MarketSnapshot);
        build_key(&entry.key_prefix, [asset_id])
    }

    /// Key of the technical-indicator payload for an asset.
    pub fn extended_key(&self, asset_id: &str) -> String {
        let entry = self
            .cache
            .registry()
            .entry(CacheCategory::MarketSnapshotExtended);
        build_key(&entry.key_prefix, [asset_id])
    }

    /// Snapshot for an asset, fetched through `provider` on a miss.
    pub async fn get_market_snapshot<T, F, Fut, E>(&self, asset_id: &str, provider: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ttl = self
            .cache
            .registry()
            .entry(CacheCategory::MarketSnapshot)
            .ttl_seconds;
        self.cache
            .get_or_set(&self.snapshot_key(asset_id), provider, Some(ttl))
            .await
    }

    /// Extended market data for an asset, fetched through `provider` on a miss.
    pub async fn get_extended_market_data<T, F, Fut, E>(
        &self,
        asset_id: &str,
        provider: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ttl = self
            .cache
            .registry()
            .entry(CacheCategory::MarketSnapshotExtended)
            .ttl_seconds;
        self.cache
            .get_or_set(&self.extended_key(asset_id), provider, Some(ttl))
            .await
    }

    /// Drops both the snapshot and the extended entry of an asset.
    pub async fn invalidate_market_cache(&self, asset_id: &str) {
        let snapshot_key = self.snapshot_key(asset_id);
        let extended_key = self.extended_key(asset_id);

        tokio::join!(
            self.cache.delete(&snapshot_key),
            self.cache.delete(&extended_key),
        );

        info!(asset_id = %asset_id, "Market cache invalidated");
    }

    /// Drops only the extended entry of an asset.
    pub async fn invalidate_extended_data(&self, asset_id: &str) {
        self.cache.delete(&self.extended_key(asset_id)).await;
        info!(asset_id = %asset_id, "Extended market cache invalidated");
    }

    /// Cache service this wrapper delegates to.
    pub fn service(&self) -> &CacheService {
        &self.cache
    }
}
