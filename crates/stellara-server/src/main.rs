//! Stellara cache server binary.

use std::sync::Arc;

use anyhow::Context;
use stellara_server::metrics::init_metrics;
use stellara_server::{AppState, Settings, StoreBackend, run_server_with_state};
use stellara_store::{KeyValueStore, MemoryStore, RedisStore};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Stellara cache server"
    );

    let addr = settings.socket_addr()?;
    let registry = settings.registry()?;

    let store: Arc<dyn KeyValueStore> = match settings.store.backend {
        StoreBackend::Redis => Arc::new(
            RedisStore::connect(&settings.store.redis_url)
                .await
                .context("failed to connect to Redis")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using in-process memory store; cache is not shared between instances");
            Arc::new(MemoryStore::new(settings.store.memory_capacity))
        },
    };
    tracing::info!(store = store.name(), "Store ready");

    let prometheus_handle = init_metrics().context("failed to install metrics recorder")?;

    let state = AppState::with_simulated_feeds(store, registry, settings.feed_latency());

    run_server_with_state(addr, state, prometheus_handle).await?;

    Ok(())
}
