//! News endpoints.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::key_segment;
use crate::error::AppError;
use crate::feeds::NewsArticle;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub category: Option<String>,
}

/// GET /api/cache/news?category=
///
/// A missing or empty category means every category.
pub async fn get_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<NewsArticle>>, AppError> {
    let category = match query.category.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(category) => Some(key_segment(category)?),
    };

    let articles = state.news().get_news(category).await?;
    Ok(Json(articles))
}

/// GET /api/cache/news/trending
pub async fn get_trending_news(
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsArticle>>, AppError> {
    let articles = state.news().get_trending_news().await?;
    Ok(Json(articles))
}
