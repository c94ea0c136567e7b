//! Test helpers for stellara-server.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod feeds;
pub mod store;

pub use client::{TestClient, TestResponse};
pub use feeds::{FailingMarketFeed, FailingNewsFeed};
pub use store::{Op, RecordingStore, StoreCall};

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use stellara_core::TtlRegistry;
use stellara_server::AppState;
use stellara_server::feeds::FeedLatency;

/// State over a recording store and zero-latency simulated feeds.
pub fn test_state() -> (AppState, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::new());
    let state =
        AppState::with_simulated_feeds(store.clone(), TtlRegistry::default(), FeedLatency::none());
    (state, store)
}

/// Client over the full router, without installing a global recorder.
pub fn app_client(state: AppState) -> TestClient {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    TestClient::new(stellara_server::create_router_with_state(state, handle))
}
