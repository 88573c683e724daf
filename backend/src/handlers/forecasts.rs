//! HTTP handlers for demand forecasting

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared::Forecast;

use crate::error::AppResult;
use crate::services::ForecastService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ForecastQuery {
    pub days: Option<i64>,
}

/// Get stored forecasts for a product over the coming days
pub async fn get_forecasts(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<Vec<Forecast>>> {
    let days = query.days.unwrap_or(7).clamp(1, 90);

    let service = ForecastService::new(state.db);
    let forecasts = service.get_forecasts(product_id, days).await?;
    Ok(Json(forecasts))
}

/// Recompute forecasts for a product right now. Returns an empty list when
/// the product has too little sales history.
pub async fn generate_forecasts(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<Forecast>>> {
    let service = ForecastService::new(state.db);
    let forecasts = service.forecast_product(product_id).await?;
    Ok(Json(forecasts))
}
