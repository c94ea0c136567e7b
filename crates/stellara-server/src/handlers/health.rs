use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Name of the store adapter in use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

/// Liveness only; the store is not pinged.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        store: None,
    })
}

/// Same as [`health_check`], reporting the store adapter.
pub async fn health_with_store(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        store: Some(state.cache().store_name().to_string()),
    })
}
