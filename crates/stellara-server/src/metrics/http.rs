//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

/// Middleware that records HTTP metrics for every request.
///
/// Uses the matched route template (`/api/cache/market/{asset_id}`) as the
/// `path` label so asset ids don't explode label cardinality.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();

    counter!(
        "stellara_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "stellara_http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Describes the HTTP metrics.
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "stellara_http_requests_total",
        "Total number of HTTP requests"
    );
    metrics::describe_histogram!(
        "stellara_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
}
