//! Product catalog service.
//!
//! CRUD over the product table. Status is always derived through
//! `shared::stock::derive_status`, the same function the stock ledger uses,
//! so the two mutation paths cannot disagree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{
    stock, Pagination, PagedResponse, Product, ProductStatus, SalesDataPoint, StockMovement,
};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub sku: String,
    pub current_stock: i32,
    pub min_stock: i32,
    pub max_stock: i32,
    pub unit_price: Decimal,
    pub lead_time_days: i32,
    #[serde(default)]
    pub trend_score: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    /// Absent leaves the description untouched; an explicit null clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub lead_time_days: Option<i32>,
    pub trend_score: Option<i32>,
    /// Explicit status override; only meaningful for discontinuing a product
    /// or bringing a discontinued one back (the stock-derived status is
    /// recomputed in that case).
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    pub search: Option<String>,
}

/// Product with its recent activity, for the detail view.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub recent_movements: Vec<StockMovement>,
    pub recent_sales: Vec<SalesDataPoint>,
}

const PRODUCT_COLUMNS: &str = "id, name, description, category, sku, current_stock, min_stock, \
     max_stock, unit_price, lead_time_days, status, trend_score, is_active, created_at, updated_at";

/// Distinguishes a field that was omitted from one explicitly set to null.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_create(&input)?;

        let trend_score = input.trend_score.unwrap_or(0);
        let status = stock::derive_status(input.current_stock, input.min_stock, ProductStatus::InStock);

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                name, description, category, sku, current_stock, min_stock, max_stock,
                unit_price, lead_time_days, status, trend_score
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.category.trim())
        .bind(input.sku.trim())
        .bind(input.current_stock)
        .bind(input.min_stock)
        .bind(input.max_stock)
        .bind(input.unit_price)
        .bind(input.lead_time_days)
        .bind(status)
        .bind(trend_score)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.constraint() == Some("products_sku_key") => {
                AppError::DuplicateEntry("sku".to_string())
            }
            _ => AppError::DatabaseError(e),
        })?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    pub async fn list(
        &self,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResponse<Product>> {
        let pagination = pagination.clamped();
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products
            WHERE is_active
              AND ($1::text IS NULL OR category = $1)
              AND ($2::product_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR sku ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(&filter.category)
        .bind(filter.status)
        .bind(search)
        .fetch_one(&self.db)
        .await?;

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE is_active
              AND ($1::text IS NULL OR category = $1)
              AND ($2::product_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR sku ILIKE '%' || $3 || '%')
            ORDER BY updated_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(&filter.category)
        .bind(filter.status)
        .bind(search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PagedResponse::new(products, pagination, total))
    }

    pub async fn get(&self, product_id: Uuid) -> AppResult<ProductDetail> {
        let product = self.fetch(product_id).await?;

        let recent_movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, product_id, movement_type, quantity, reason, reference, created_at
            FROM stock_movements
            WHERE product_id = $1
            ORDER BY created_at DESC
            LIMIT 10
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        let recent_sales = sqlx::query_as::<_, SalesDataPoint>(
            r#"
            SELECT id, product_id, date, forecast_quantity, actual_quantity, created_at
            FROM sales_data
            WHERE product_id = $1
            ORDER BY date DESC
            LIMIT 12
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ProductDetail {
            product,
            recent_movements,
            recent_sales,
        })
    }

    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        validate_update(&input)?;

        let existing = self.fetch(product_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let description = input.description.unwrap_or(existing.description);
        let category = input.category.unwrap_or(existing.category);
        let min_stock = input.min_stock.unwrap_or(existing.min_stock);
        let max_stock = input.max_stock.unwrap_or(existing.max_stock);
        let unit_price = input.unit_price.unwrap_or(existing.unit_price);
        let lead_time_days = input.lead_time_days.unwrap_or(existing.lead_time_days);
        let trend_score = input.trend_score.unwrap_or(existing.trend_score);

        // Status stays a function of stock, with two exceptions: explicitly
        // discontinuing a product, and reactivating a discontinued one (any
        // non-discontinued status requested triggers a re-derivation).
        let status = match input.status {
            Some(ProductStatus::Discontinued) => ProductStatus::Discontinued,
            Some(_) => stock::derive_status(existing.current_stock, min_stock, ProductStatus::InStock),
            None => stock::derive_status(existing.current_stock, min_stock, existing.status),
        };

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, category = $4, min_stock = $5, max_stock = $6,
                unit_price = $7, lead_time_days = $8, trend_score = $9, status = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product_id)
        .bind(name.trim())
        .bind(&description)
        .bind(category.trim())
        .bind(min_stock)
        .bind(max_stock)
        .bind(unit_price)
        .bind(lead_time_days)
        .bind(trend_score)
        .bind(status)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Soft delete: movements and alerts keep referencing the row.
    pub async fn deactivate(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(product_id = %product_id, "product deactivated");
        Ok(())
    }

    async fn fetch(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }
}

fn validate_create(input: &CreateProductInput) -> AppResult<()> {
    if input.name.trim().is_empty() {
        return Err(AppError::validation("name", "Name is required"));
    }
    if input.category.trim().is_empty() {
        return Err(AppError::validation("category", "Category is required"));
    }
    if input.sku.trim().is_empty() {
        return Err(AppError::validation("sku", "SKU is required"));
    }
    if input.current_stock < 0 {
        return Err(AppError::validation(
            "current_stock",
            "Current stock must be a non-negative integer",
        ));
    }
    if input.min_stock < 0 {
        return Err(AppError::validation(
            "min_stock",
            "Min stock must be a non-negative integer",
        ));
    }
    if input.max_stock < 1 {
        return Err(AppError::validation(
            "max_stock",
            "Max stock must be a positive integer",
        ));
    }
    if input.unit_price < Decimal::ZERO {
        return Err(AppError::validation(
            "unit_price",
            "Unit price must be a non-negative number",
        ));
    }
    if input.lead_time_days < 1 {
        return Err(AppError::validation(
            "lead_time_days",
            "Lead time must be a positive integer",
        ));
    }
    validate_trend_score(input.trend_score)
}

fn validate_update(input: &UpdateProductInput) -> AppResult<()> {
    if let Some(name) = &input.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("name", "Name cannot be empty"));
        }
    }
    if let Some(min_stock) = input.min_stock {
        if min_stock < 0 {
            return Err(AppError::validation(
                "min_stock",
                "Min stock must be a non-negative integer",
            ));
        }
    }
    if let Some(max_stock) = input.max_stock {
        if max_stock < 1 {
            return Err(AppError::validation(
                "max_stock",
                "Max stock must be a positive integer",
            ));
        }
    }
    if let Some(unit_price) = input.unit_price {
        if unit_price < Decimal::ZERO {
            return Err(AppError::validation(
                "unit_price",
                "Unit price must be a non-negative number",
            ));
        }
    }
    if let Some(lead_time_days) = input.lead_time_days {
        if lead_time_days < 1 {
            return Err(AppError::validation(
                "lead_time_days",
                "Lead time must be a positive integer",
            ));
        }
    }
    validate_trend_score(input.trend_score)
}

fn validate_trend_score(trend_score: Option<i32>) -> AppResult<()> {
    if let Some(score) = trend_score {
        if !(0..=10).contains(&score) {
            return Err(AppError::validation(
                "trend_score",
                "Trend score must be between 0 and 10",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_description_keeps_the_existing_one() {
        let input: UpdateProductInput = serde_json::from_str(r#"{"name": "Beans"}"#).unwrap();
        assert_eq!(input.description, None);

        let existing = Some("single origin".to_string());
        assert_eq!(input.description.unwrap_or(existing.clone()), existing);
    }

    #[test]
    fn null_description_clears_it() {
        let input: UpdateProductInput =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(input.description, Some(None));

        let existing = Some("single origin".to_string());
        assert_eq!(input.description.unwrap_or(existing), None);
    }

    #[test]
    fn provided_description_replaces_it() {
        let input: UpdateProductInput =
            serde_json::from_str(r#"{"description": "dark roast"}"#).unwrap();
        assert_eq!(input.description, Some(Some("dark roast".to_string())));
    }
}
