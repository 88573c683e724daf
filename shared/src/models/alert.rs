use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Alert categories raised by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_type", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    StockLow,
    StockOut,
    ReorderNeeded,
    ForecastDeviation,
    TrendSpike,
    SystemError,
}

/// Alert priority. Declaration order matches the Postgres enum so that
/// `ORDER BY priority DESC` sorts critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_priority", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// A raised alert.
///
/// Alerts are an audit trail of incidents, not a live status mirror: once
/// open they stay unresolved until an operator resolves them, even if the
/// underlying condition clears.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub message: String,
    pub action: Option<String>,
    pub product_id: Option<Uuid>,
    pub priority: AlertPriority,
    pub is_read: bool,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Static replenishment configuration consumed by the alert monitor.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReorderPoint {
    pub id: Uuid,
    pub product_id: Uuid,
    pub reorder_level: i32,
    pub reorder_quantity: i32,
    pub lead_time_days: i32,
    pub safety_stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
