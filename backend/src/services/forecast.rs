//! Forecasting service.
//!
//! Reads recent sales history and writes one forecast row per algorithm per
//! product. The scheduled full-catalog sweep and the on-demand per-product
//! endpoint both go through [`ForecastService::forecast_for`], so there is a
//! single copy of the pipeline around the pure math in `shared::forecast`.

use chrono::{Datelike, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shared::forecast::{self, Observation};
use shared::{Forecast, Product, SalesDataPoint};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ForecastService {
    db: PgPool,
}

impl ForecastService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Full-catalog sweep: forecast every active product with enough sales
    /// history. Per-product failures are logged and skipped; one bad product
    /// must not block forecasting for the rest. Returns the number of
    /// forecast rows written.
    pub async fn run_sweep(&self) -> AppResult<u64> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, category, sku, current_stock, min_stock, max_stock,
                   unit_price, lead_time_days, status, trend_score, is_active, created_at, updated_at
            FROM products
            WHERE is_active
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut written = 0u64;
        for product in &products {
            match self.forecast_for(product.id, product.trend_score).await {
                Ok(forecasts) => written += forecasts.len() as u64,
                Err(e) => {
                    tracing::error!(product_id = %product.id, error = %e, "forecast failed, skipping product");
                }
            }
        }

        tracing::info!(products = products.len(), written, "forecast sweep completed");
        Ok(written)
    }

    /// On-demand entry point for a single product. Returns the forecast rows
    /// written, or an empty vector when history is insufficient (a skipped
    /// computation, not a failure).
    pub async fn forecast_product(&self, product_id: Uuid) -> AppResult<Vec<Forecast>> {
        let trend_score = sqlx::query_scalar::<_, i32>(
            "SELECT trend_score FROM products WHERE id = $1 AND is_active",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        self.forecast_for(product_id, trend_score).await
    }

    /// Read forecasts for a product with target dates in the next `days`
    /// days.
    pub async fn get_forecasts(&self, product_id: Uuid, days: i64) -> AppResult<Vec<Forecast>> {
        let today = Utc::now().date_naive();
        let forecasts = sqlx::query_as::<_, Forecast>(
            r#"
            SELECT id, product_id, forecast_date, quantity, confidence, algorithm, created_at
            FROM forecasts
            WHERE product_id = $1 AND forecast_date >= $2 AND forecast_date <= $3
            ORDER BY forecast_date ASC, created_at ASC
            "#,
        )
        .bind(product_id)
        .bind(today)
        .bind(today + Duration::days(days))
        .fetch_all(&self.db)
        .await?;

        Ok(forecasts)
    }

    /// Shared pipeline: snapshot the last 30 days of history, run the three
    /// algorithms, persist one row each for a target date 7 days out.
    async fn forecast_for(&self, product_id: Uuid, trend_score: i32) -> AppResult<Vec<Forecast>> {
        let history = sqlx::query_as::<_, SalesDataPoint>(
            r#"
            SELECT id, product_id, date, forecast_quantity, actual_quantity, created_at
            FROM sales_data
            WHERE product_id = $1
            ORDER BY date DESC
            LIMIT 30
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        let observations: Vec<Observation> = history
            .iter()
            .map(|row| Observation {
                forecast_quantity: row.forecast_quantity,
                actual_quantity: row.actual_quantity,
            })
            .collect();

        let now = Utc::now();
        let Some(points) = forecast::generate(&observations, trend_score, now.weekday()) else {
            tracing::debug!(
                product_id = %product_id,
                rows = observations.len(),
                "insufficient sales history, skipping forecast"
            );
            return Ok(Vec::new());
        };

        let target_date = now.date_naive() + Duration::days(7);

        let mut written = Vec::with_capacity(points.len());
        for point in points {
            let forecast = sqlx::query_as::<_, Forecast>(
                r#"
                INSERT INTO forecasts (product_id, forecast_date, quantity, confidence, algorithm)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, product_id, forecast_date, quantity, confidence, algorithm, created_at
                "#,
            )
            .bind(product_id)
            .bind(target_date)
            .bind(point.quantity)
            .bind(point.confidence)
            .bind(point.algorithm)
            .fetch_one(&self.db)
            .await?;
            written.push(forecast);
        }

        Ok(written)
    }
}
