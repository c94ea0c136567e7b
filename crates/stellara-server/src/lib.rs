//! # Stellara Server
//!
//! Cache layer for market data and news in front of a key-value store.
//!
//! - [`cache`]: cache service, domain wrappers and invalidation dispatch
//! - [`feeds`] / [`api`]: upstream providers and their cached facades
//! - [`server`]: the read-only axum router
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stellara_core::{AssetUpdateKind, TtlRegistry};
//! use stellara_server::AppState;
//! use stellara_server::feeds::FeedLatency;
//! use stellara_store::MemoryStore;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let state = AppState::with_simulated_feeds(
//!     Arc::new(MemoryStore::default()),
//!     TtlRegistry::default(),
//!     FeedLatency::default(),
//! );
//!
//! let snapshot = state.market().get_market_snapshot("USD-STELLARA").await.unwrap();
//! state
//!     .invalidation()
//!     .emit_asset_updated(&snapshot.asset_id, AssetUpdateKind::Price)
//!     .await;
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod error;
pub mod feeds;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use server::{create_router, create_router_with_state, run_server_with_state};
pub use settings::{Settings, SettingsError, StoreBackend};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
