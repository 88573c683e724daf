//! HTTP handlers for social trend data

use axum::{
    extract::{Query, State},
    Json,
};

use shared::TrendData;

use crate::error::AppResult;
use crate::services::trend::TrendFilter;
use crate::services::TrendService;
use crate::AppState;

/// List trending topics, most mentioned first
pub async fn list_trends(
    State(state): State<AppState>,
    Query(filter): Query<TrendFilter>,
) -> AppResult<Json<Vec<TrendData>>> {
    let service = TrendService::new(state.db);
    let trends = service.list(filter).await?;
    Ok(Json(trends))
}
