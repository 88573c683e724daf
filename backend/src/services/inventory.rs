//! Stock ledger service.
//!
//! Applies stock movements atomically: the movement row is appended and the
//! product's materialized `current_stock`/`status` are updated inside one
//! transaction, with the product row locked for the read-modify-write so
//! concurrent movements on the same product cannot lose updates.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::{
    stock, AlertPriority, MovementType, Pagination, PagedResponse, Product, ProductStatus,
    ReorderPoint, StockMovement,
};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct RecordMovementInput {
    pub product_id: Uuid,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: Option<String>,
    pub reference: Option<String>,
}

/// Result of applying one movement: the appended ledger entry and the
/// product with its updated stock and status.
#[derive(Debug, Serialize)]
pub struct MovementResult {
    pub movement: StockMovement,
    pub product: Product,
}

/// Ledger entry joined with its product's name and SKU, for list views.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MovementWithProduct {
    pub id: Uuid,
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: Option<String>,
    pub reference: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub product_name: String,
    pub product_sku: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct MovementFilter {
    pub product_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub movement_type: Option<MovementType>,
}

/// Replenishment suggestion for a product in LOW/OUT status.
#[derive(Debug, Serialize)]
pub struct ReorderRecommendation {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub current_stock: i32,
    pub min_stock: i32,
    pub status: ProductStatus,
    pub reorder_point: Option<ReorderPoint>,
    pub urgency: AlertPriority,
}

impl InventoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply one stock movement and recompute the derived status.
    ///
    /// Both effects (append movement, update product) commit together or not
    /// at all; a movement that exists while the product total disagrees would
    /// be a consistency violation.
    pub async fn record_movement(&self, input: RecordMovementInput) -> AppResult<MovementResult> {
        if input.quantity <= 0 {
            return Err(AppError::validation(
                "quantity",
                "Quantity must be a positive integer",
            ));
        }

        let mut tx = self.db.begin().await?;

        // Lock the product row for the read-modify-write.
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, category, sku, current_stock, min_stock, max_stock,
                   unit_price, lead_time_days, status, trend_score, is_active, created_at, updated_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let new_stock = stock::apply_movement(
            product.current_stock,
            input.movement_type,
            input.quantity,
        );
        let new_status = stock::derive_status(new_stock, product.min_stock, product.status);

        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (product_id, movement_type, quantity, reason, reference)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, movement_type, quantity, reason, reference, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.movement_type)
        .bind(input.quantity)
        .bind(&input.reason)
        .bind(&input.reference)
        .fetch_one(&mut *tx)
        .await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET current_stock = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, category, sku, current_stock, min_stock, max_stock,
                      unit_price, lead_time_days, status, trend_score, is_active, created_at, updated_at
            "#,
        )
        .bind(input.product_id)
        .bind(new_stock)
        .bind(new_status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            product_id = %product.id,
            movement_type = input.movement_type.as_str(),
            quantity = input.quantity,
            new_stock,
            status = product.status.as_str(),
            "stock movement recorded"
        );

        Ok(MovementResult { movement, product })
    }

    /// List ledger entries, newest first, optionally filtered by product and
    /// movement type.
    pub async fn list_movements(
        &self,
        filter: MovementFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResponse<MovementWithProduct>> {
        let pagination = pagination.clamped();

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM stock_movements
            WHERE ($1::uuid IS NULL OR product_id = $1)
              AND ($2::movement_type IS NULL OR movement_type = $2)
            "#,
        )
        .bind(filter.product_id)
        .bind(filter.movement_type)
        .fetch_one(&self.db)
        .await?;

        let movements = sqlx::query_as::<_, MovementWithProduct>(
            r#"
            SELECT m.id, m.product_id, m.movement_type, m.quantity, m.reason, m.reference,
                   m.created_at, p.name AS product_name, p.sku AS product_sku
            FROM stock_movements m
            JOIN products p ON p.id = m.product_id
            WHERE ($1::uuid IS NULL OR m.product_id = $1)
              AND ($2::movement_type IS NULL OR m.movement_type = $2)
            ORDER BY m.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.product_id)
        .bind(filter.movement_type)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PagedResponse::new(movements, pagination, total))
    }

    /// Replenishment suggestions for every active product currently in
    /// LOW_STOCK or OUT_OF_STOCK status.
    pub async fn reorder_recommendations(&self) -> AppResult<Vec<ReorderRecommendation>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, category, sku, current_stock, min_stock, max_stock,
                   unit_price, lead_time_days, status, trend_score, is_active, created_at, updated_at
            FROM products
            WHERE is_active AND status IN ('low_stock', 'out_of_stock')
            ORDER BY current_stock ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut recommendations = Vec::with_capacity(products.len());
        for product in products {
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

            let urgency = if product.status == ProductStatus::OutOfStock {
                AlertPriority::Critical
            } else if product.current_stock * 2 <= product.min_stock {
                AlertPriority::High
            } else {
                AlertPriority::Medium
            };

            recommendations.push(ReorderRecommendation {
                product_id: product.id,
                name: product.name,
                sku: product.sku,
                current_stock: product.current_stock,
                min_stock: product.min_stock,
                status: product.status,
                reorder_point,
                urgency,
            });
        }

        Ok(recommendations)
    }
}
