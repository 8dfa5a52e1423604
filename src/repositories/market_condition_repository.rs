use crate::models::MarketCondition;
use sqlx::{PgPool, Result as SqlxResult};

/// Repository for market condition data access
pub struct MarketConditionRepository {
    pool: PgPool,
}

impl MarketConditionRepository {
    /// Create a new MarketConditionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new market condition snapshot
    pub async fn create(&self, condition_data: &serde_json::Value) -> SqlxResult<MarketCondition> {
        sqlx::query_as::<_, MarketCondition>(
            r#"
            INSERT INTO market_conditions (condition_data)
            VALUES ($1)
            RETURNING id, is_active, condition_data, created_at
            "#,
        )
        .bind(condition_data)
        .fetch_one(&self.pool)
        .await
    }

    /// Find all active market conditions, newest first
    pub async fn find_active(&self) -> SqlxResult<Vec<MarketCondition>> {
        sqlx::query_as::<_, MarketCondition>(
            r#"
            SELECT id, is_active, condition_data, created_at
            FROM market_conditions
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
