use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stock status of a product.
///
/// Always derived from `current_stock` vs `min_stock` (see [`crate::stock`]),
/// except `Discontinued` which is an explicit manual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    InStock,
    LowStock,
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::InStock => "in_stock",
            ProductStatus::LowStock => "low_stock",
            ProductStatus::OutOfStock => "out_of_stock",
            ProductStatus::Discontinued => "discontinued",
        }
    }
}

/// A catalog product with its materialized stock level.
///
/// `current_stock` is the running total of all stock movements (with
/// adjustments treated as absolute sets); replaying the movement ledger from
/// zero must reproduce it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub sku: String,
    pub current_stock: i32,
    pub min_stock: i32,
    pub max_stock: i32,
    pub unit_price: Decimal,
    pub lead_time_days: i32,
    pub status: ProductStatus,
    pub trend_score: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
