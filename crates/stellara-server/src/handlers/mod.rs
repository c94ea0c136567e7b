//! HTTP handlers.

pub mod cache;
pub mod health;
pub mod market;
pub mod metrics;
pub mod news;

use stellara_core::keys::try_build_key;

use crate::error::AppError;

/// Rejects path or query values that would add segments to a cache key.
fn key_segment(value: &str) -> Result<&str, AppError> {
    try_build_key("", [value]).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(value)
}
