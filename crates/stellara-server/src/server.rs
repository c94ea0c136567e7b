use std::net::SocketAddr;

use axum::{Router, middleware, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};

use crate::handlers::{
    cache::{get_cache_info, get_cache_metrics},
    health::{health_check, health_with_store},
    market::{get_extended_market_data, get_market_snapshot},
    metrics::prometheus_metrics,
    news::{get_news, get_trending_news},
};
use crate::middleware::{MakeRequestUuidV7, REQUEST_ID_HEADER, trace_layer};
use crate::state::AppState;

/// Read-only cache routes, mounted under `/api/cache`.
fn cache_routes() -> Router<AppState> {
    Router::new()
        .route("/market/{asset_id}", get(get_market_snapshot))
        .route("/market/{asset_id}/extended", get(get_extended_market_data))
        .route("/news", get(get_news))
        .route("/news/trending", get(get_trending_news))
        .route("/metrics", get(get_cache_metrics))
        .route("/info", get(get_cache_info))
}

fn with_middleware(router: Router) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            REQUEST_ID_HEADER.clone(),
            MakeRequestUuidV7,
        ))
        .layer(trace_layer())
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER.clone()));

    router
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(middleware_stack)
}

/// Creates a router with the given application state and metrics handle.
pub fn create_router_with_state(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(prometheus_handle);

    let app_router = Router::new()
        .route("/health", get(health_with_store))
        .nest("/api/cache", cache_routes())
        .with_state(state);

    with_middleware(Router::new().merge(app_router).merge(metrics_router))
}

/// Creates a router without state (health endpoint only).
pub fn create_router() -> Router {
    with_middleware(Router::new().route("/health", get(health_check)))
}

/// Runs the server with the given state and metrics handle.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = create_router_with_state(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
