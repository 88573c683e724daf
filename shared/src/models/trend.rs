use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A social-media trend observation ingested from an external feed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TrendData {
    pub id: Uuid,
    pub platform: String,
    pub topic: String,
    pub mentions: i64,
    /// Relative change in mentions, in percent (e.g. 35.0 = +35%).
    pub change_percent: Decimal,
    pub keywords: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
