use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One day of sales history for a product.
///
/// `actual_quantity` stays null until the day closes; forecasting falls back
/// to `forecast_quantity` for such rows.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalesDataPoint {
    pub id: Uuid,
    pub product_id: Uuid,
    pub date: NaiveDate,
    pub forecast_quantity: i32,
    pub actual_quantity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Forecasting algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "forecast_algorithm", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ForecastAlgorithm {
    Linear,
    Seasonal,
    TrendAdjusted,
}

impl ForecastAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastAlgorithm::Linear => "linear",
            ForecastAlgorithm::Seasonal => "seasonal",
            ForecastAlgorithm::TrendAdjusted => "trend-adjusted",
        }
    }
}

/// Persisted forecast produced by one algorithm for one target date.
///
/// Append-only; one row per algorithm per run, never merged across
/// algorithms.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Forecast {
    pub id: Uuid,
    pub product_id: Uuid,
    pub forecast_date: NaiveDate,
    pub quantity: i32,
    pub confidence: i32,
    pub algorithm: ForecastAlgorithm,
    pub created_at: DateTime<Utc>,
}
