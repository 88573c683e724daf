//! HTTP handlers for the stock ledger

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use shared::{PagedResponse, Pagination};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{
    MovementFilter, MovementResult, MovementWithProduct, RecordMovementInput,
    ReorderRecommendation,
};
use crate::services::InventoryService;
use crate::AppState;

/// Record a stock movement
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<(StatusCode, Json<MovementResult>)> {
    current_user.0.require_inventory_manager()?;

    let service = InventoryService::new(state.db);
    let result = service.record_movement(input).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// List stock movements, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PagedResponse<MovementWithProduct>>> {
    let service = InventoryService::new(state.db);
    let page = service.list_movements(filter, pagination).await?;
    Ok(Json(page))
}

/// Reorder recommendations for products in LOW/OUT status
pub async fn reorder_recommendations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReorderRecommendation>>> {
    let service = InventoryService::new(state.db);
    let recommendations = service.reorder_recommendations().await?;
    Ok(Json(recommendations))
}
