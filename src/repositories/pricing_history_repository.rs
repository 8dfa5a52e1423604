use crate::models::PricingHistoryEntry;
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

/// Repository for the append-only pricing history
pub struct PricingHistoryRepository {
    pool: PgPool,
}

impl PricingHistoryRepository {
    /// Create a new PricingHistoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one audit record
    pub async fn append(&self, entry: &PricingHistoryEntry) -> SqlxResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pricing_history (
                id, model_id, storage_capacity, device_condition,
                base_price, time_decay, supply_demand_multiplier, market_position_multiplier,
                seasonal_multiplier, storage_multiplier, condition_multiplier,
                final_value, calculated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(entry.id)
        .bind(entry.model_id)
        .bind(&entry.storage_capacity)
        .bind(&entry.device_condition)
        .bind(entry.base_price)
        .bind(entry.time_decay)
        .bind(entry.supply_demand_multiplier)
        .bind(entry.market_position_multiplier)
        .bind(entry.seasonal_multiplier)
        .bind(entry.storage_multiplier)
        .bind(entry.condition_multiplier)
        .bind(entry.final_value)
        .bind(entry.calculated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent quotes for a model
    pub async fn find_by_model(&self, model_id: Uuid, limit: i64) -> SqlxResult<Vec<PricingHistoryEntry>> {
        sqlx::query_as::<_, PricingHistoryEntry>(
            r#"
            SELECT
                id, model_id, storage_capacity, device_condition,
                base_price, time_decay, supply_demand_multiplier, market_position_multiplier,
                seasonal_multiplier, storage_multiplier, condition_multiplier,
                final_value, calculated_at
            FROM pricing_history
            WHERE model_id = $1
            ORDER BY calculated_at DESC
            LIMIT $2
            "#,
        )
        .bind(model_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
