//! Social trend data service.
//!
//! Read-only view over the `trend_data` table; the scores themselves arrive
//! through ingestion outside this service and feed the trend-adjusted
//! forecast via `products.trend_score`.

use serde::Deserialize;
use sqlx::PgPool;

use shared::TrendData;

use crate::error::AppResult;

#[derive(Clone)]
pub struct TrendService {
    db: PgPool,
}

#[derive(Debug, Deserialize, Default)]
pub struct TrendFilter {
    pub platform: Option<String>,
    pub limit: Option<i64>,
}

impl TrendService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Most-mentioned topics first, optionally scoped to one platform.
    pub async fn list(&self, filter: TrendFilter) -> AppResult<Vec<TrendData>> {
        let limit = filter.limit.unwrap_or(20).clamp(1, 100);

        let trends = sqlx::query_as::<_, TrendData>(
            r#"
            SELECT id, platform, topic, mentions, change_percent, keywords, created_at
            FROM trend_data
            WHERE ($1::text IS NULL OR platform = $1)
            ORDER BY mentions DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(&filter.platform)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(trends)
    }
}
