//! Alert monitor service.
//!
//! Periodic sweep over product and sales state: opens deduplicated alerts
//! when thresholds are crossed and pushes each created alert to the realtime
//! hub. Alerts never auto-resolve when the condition clears; they are an
//! audit trail of incidents and stay open until an operator resolves them.
//!
//! Suppression is decided by `shared::alerting::should_open` over the
//! product's unresolved alerts; this service only fetches that set and
//! persists the outcome. The read-then-create sequence has no uniqueness
//! constraint behind it, so a sweep racing a manual call can double-insert.
//! Documented best-effort behavior; see DESIGN.md.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::alerting::{self, OpenAlert};
use shared::{Alert, AlertPriority, AlertType, Pagination, PagedResponse, Product, ReorderPoint};

use crate::error::{AppError, AppResult};
use crate::services::realtime::AlertBroadcaster;

#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
    broadcaster: AlertBroadcaster,
}

/// Fields for a new alert row.
#[derive(Debug)]
struct NewAlert {
    alert_type: AlertType,
    title: String,
    message: String,
    action: Option<String>,
    product_id: Option<Uuid>,
    priority: AlertPriority,
}

#[derive(Debug, Deserialize, Default)]
pub struct AlertFilter {
    pub is_read: Option<bool>,
    pub priority: Option<AlertPriority>,
}

/// Sales row joined with its product name, for the deviation check.
#[derive(Debug, sqlx::FromRow)]
struct SalesWithProduct {
    product_id: Uuid,
    forecast_quantity: i32,
    actual_quantity: Option<i32>,
    product_name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct OpenAlertRow {
    alert_type: AlertType,
    created_at: DateTime<Utc>,
}

impl AlertService {
    pub fn new(db: PgPool, broadcaster: AlertBroadcaster) -> Self {
        Self { db, broadcaster }
    }

    /// One monitor tick: run every check over all active products and return
    /// the alerts created. Exposed directly (not only via the timer) for
    /// testability and manual triggering.
    pub async fn run_sweep(&self) -> AppResult<Vec<Alert>> {
        let mut created = Vec::new();
        created.extend(self.check_stock_levels().await?);
        created.extend(self.check_forecast_deviations().await?);

        if !created.is_empty() {
            tracing::info!(alerts = created.len(), "alert sweep created alerts");
        }
        Ok(created)
    }

    /// Checks 1-3: stock-out, low-stock and reorder-point conditions.
    async fn check_stock_levels(&self) -> AppResult<Vec<Alert>> {
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

        let mut created = Vec::new();
        for product in products {
            let open_alerts = self.open_alerts(product.id).await?;

            if let Some(condition) =
                alerting::stock_condition(product.current_stock, product.min_stock)
            {
                let new_alert = match condition {
                    alerting::StockCondition::Out => NewAlert {
                        alert_type: AlertType::StockOut,
                        title: "Stock Out Alert".to_string(),
                        message: format!("{} is out of stock", product.name),
                        action: Some("Reorder immediately".to_string()),
                        product_id: Some(product.id),
                        priority: condition.priority(),
                    },
                    alerting::StockCondition::Low => NewAlert {
                        alert_type: AlertType::StockLow,
                        title: "Low Stock Warning".to_string(),
                        message: format!(
                            "{} stock is below minimum threshold ({}/{})",
                            product.name, product.current_stock, product.min_stock
                        ),
                        action: Some("Review reorder requirements".to_string()),
                        product_id: Some(product.id),
                        priority: condition.priority(),
                    },
                };
                if alerting::should_open(new_alert.alert_type, &open_alerts) {
                    created.push(self.create_alert(new_alert).await?);
                }
            }

            if let Some(alert) = self.check_reorder_point(&product, &open_alerts).await? {
                created.push(alert);
            }
        }

        Ok(created)
    }

    async fn check_reorder_point(
        &self,
        product: &Product,
        open_alerts: &[OpenAlert],
    ) -> AppResult<Option<Alert>> {
        let reorder_point = sqlx::query_as::<_, ReorderPoint>(
            r#"
            SELECT id, product_id, reorder_level, reorder_quantity, lead_time_days,
                   safety_stock, is_active, created_at
            FROM reorder_points
            WHERE product_id = $1 AND is_active
            LIMIT 1
            "#,
        )
        .bind(product.id)
        .fetch_optional(&self.db)
        .await?;

        let Some(reorder_point) = reorder_point else {
            return Ok(None);
        };

        if !alerting::reorder_needed(product.current_stock, reorder_point.reorder_level) {
            return Ok(None);
        }

        if !alerting::should_open(AlertType::ReorderNeeded, open_alerts) {
            return Ok(None);
        }

        let alert = self
            .create_alert(NewAlert {
                alert_type: AlertType::ReorderNeeded,
                title: "Reorder Needed".to_string(),
                message: format!(
                    "{} has reached reorder point. Suggested quantity: {}",
                    product.name, reorder_point.reorder_quantity
                ),
                action: Some("Create purchase order".to_string()),
                product_id: Some(product.id),
                priority: AlertPriority::High,
            })
            .await?;

        Ok(Some(alert))
    }

    /// Check 4: actual sales deviating more than 30% from the planning
    /// figure over the last 3 days.
    async fn check_forecast_deviations(&self) -> AppResult<Vec<Alert>> {
        let window_start = Utc::now() - Duration::days(3);

        let sales = sqlx::query_as::<_, SalesWithProduct>(
            r#"
            SELECT s.product_id, s.forecast_quantity, s.actual_quantity, p.name AS product_name
            FROM sales_data s
            JOIN products p ON p.id = s.product_id
            WHERE s.actual_quantity IS NOT NULL AND s.date >= $1
            "#,
        )
        .bind(window_start.date_naive())
        .fetch_all(&self.db)
        .await?;

        let mut created = Vec::new();
        for sale in sales {
            let Some(actual) = sale.actual_quantity else {
                continue;
            };
            let Some(deviation) = alerting::forecast_deviation(actual, sale.forecast_quantity)
            else {
                continue;
            };
            if deviation <= alerting::DEVIATION_THRESHOLD {
                continue;
            }

            // Re-read per row so an alert created earlier in this sweep
            // suppresses later deviating rows for the same product.
            let open_alerts = self.open_alerts(sale.product_id).await?;
            if !alerting::should_open(AlertType::ForecastDeviation, &open_alerts) {
                continue;
            }

            let alert = self
                .create_alert(NewAlert {
                    alert_type: AlertType::ForecastDeviation,
                    title: "Forecast Deviation Alert".to_string(),
                    message: format!(
                        "{} sales deviated {}% from forecast (Actual: {}, Forecast: {})",
                        sale.product_name,
                        (deviation * 100.0).round() as i64,
                        actual,
                        sale.forecast_quantity
                    ),
                    action: Some("Review forecasting model".to_string()),
                    product_id: Some(sale.product_id),
                    priority: alerting::deviation_priority(deviation),
                })
                .await?;
            created.push(alert);
        }

        Ok(created)
    }

    /// The product's unresolved alerts, as input to the suppression
    /// decision.
    async fn open_alerts(&self, product_id: Uuid) -> AppResult<Vec<OpenAlert>> {
        let rows = sqlx::query_as::<_, OpenAlertRow>(
            "SELECT alert_type, created_at FROM alerts WHERE product_id = $1 AND NOT is_resolved",
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        let now = Utc::now();
        Ok(rows
            .into_iter()
            .map(|row| OpenAlert {
                alert_type: row.alert_type,
                age_days: (now - row.created_at).num_days(),
            })
            .collect())
    }

    /// Persist the alert, then push it to live viewers. Delivery is
    /// fire-and-forget; the stored row is the source of truth.
    async fn create_alert(&self, new_alert: NewAlert) -> AppResult<Alert> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (alert_type, title, message, action, product_id, priority)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, alert_type, title, message, action, product_id, priority,
                      is_read, is_resolved, resolved_at, created_at
            "#,
        )
        .bind(new_alert.alert_type)
        .bind(&new_alert.title)
        .bind(&new_alert.message)
        .bind(&new_alert.action)
        .bind(new_alert.product_id)
        .bind(new_alert.priority)
        .fetch_one(&self.db)
        .await?;

        self.broadcaster.publish(&alert);

        tracing::info!(
            alert_id = %alert.id,
            title = %alert.title,
            message = %alert.message,
            "alert created"
        );
        Ok(alert)
    }

    /// List alerts, most urgent and most recent first.
    pub async fn list(
        &self,
        filter: AlertFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResponse<Alert>> {
        let pagination = pagination.clamped();

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM alerts
            WHERE ($1::boolean IS NULL OR is_read = $1)
              AND ($2::alert_priority IS NULL OR priority = $2)
            "#,
        )
        .bind(filter.is_read)
        .bind(filter.priority)
        .fetch_one(&self.db)
        .await?;

        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT id, alert_type, title, message, action, product_id, priority,
                   is_read, is_resolved, resolved_at, created_at
            FROM alerts
            WHERE ($1::boolean IS NULL OR is_read = $1)
              AND ($2::alert_priority IS NULL OR priority = $2)
            ORDER BY priority DESC, created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.is_read)
        .bind(filter.priority)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PagedResponse::new(alerts, pagination, total))
    }

    pub async fn unread_count(&self) -> AppResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM alerts WHERE NOT is_read")
                .fetch_one(&self.db)
                .await?;
        Ok(count)
    }

    pub async fn mark_read(&self, alert_id: Uuid) -> AppResult<Alert> {
        sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts SET is_read = TRUE
            WHERE id = $1
            RETURNING id, alert_type, title, message, action, product_id, priority,
                      is_read, is_resolved, resolved_at, created_at
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))
    }

    /// Explicit operator resolution; the only way an alert leaves the open
    /// state.
    pub async fn resolve(&self, alert_id: Uuid) -> AppResult<Alert> {
        sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts SET is_resolved = TRUE, resolved_at = NOW()
            WHERE id = $1
            RETURNING id, alert_type, title, message, action, product_id, priority,
                      is_read, is_resolved, resolved_at, created_at
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))
    }
}
