//! Market data endpoints.

use axum::{
    Json,
    extract::{Path, State},
};

use super::key_segment;
use crate::error::AppError;
use crate::feeds::{ExtendedMarketData, MarketSnapshot};
use crate::state::AppState;

/// GET /api/cache/market/{asset_id}
pub async fn get_market_snapshot(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<MarketSnapshot>, AppError> {
    let asset_id = key_segment(&asset_id)?;
    let snapshot = state.market().get_market_snapshot(asset_id).await?;
    Ok(Json(snapshot))
}

/// GET /api/cache/market/{asset_id}/extended
pub async fn get_extended_market_data(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Json<ExtendedMarketData>, AppError> {
    let asset_id = key_segment(&asset_id)?;
    let data = state.market().get_extended_market_data(asset_id).await?;
    Ok(Json(data))
}
