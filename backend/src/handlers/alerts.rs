//! HTTP handlers for the alert monitor

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use shared::{Alert, PagedResponse, Pagination};

use crate::error::AppResult;
use crate::services::alert::AlertFilter;
use crate::services::AlertService;
use crate::AppState;

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[derive(Serialize)]
pub struct SweepResponse {
    pub created: Vec<Alert>,
}

/// List alerts, most urgent first
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<PagedResponse<Alert>>> {
    let service = AlertService::new(state.db, state.alerts);
    let page = service.list(filter, pagination).await?;
    Ok(Json(page))
}

/// Number of unread alerts, for the notification badge
pub async fn unread_count(State(state): State<AppState>) -> AppResult<Json<UnreadCountResponse>> {
    let service = AlertService::new(state.db, state.alerts);
    let unread = service.unread_count().await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Run a monitor sweep now instead of waiting for the timer
pub async fn run_sweep(State(state): State<AppState>) -> AppResult<Json<SweepResponse>> {
    let service = AlertService::new(state.db, state.alerts);
    let created = service.run_sweep().await?;
    Ok(Json(SweepResponse { created }))
}

/// Mark an alert as read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<Alert>> {
    let service = AlertService::new(state.db, state.alerts);
    let alert = service.mark_read(alert_id).await?;
    Ok(Json(alert))
}

/// Resolve an alert
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<Alert>> {
    let service = AlertService::new(state.db, state.alerts);
    let alert = service.resolve(alert_id).await?;
    Ok(Json(alert))
}
