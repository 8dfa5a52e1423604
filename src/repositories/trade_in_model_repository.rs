use crate::error::RepositoryError;
use crate::models::{NewTradeInModel, TradeInModel};
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

const MODEL_COLUMNS: &str = r#"
    id,
    brand,
    name,
    release_date,
    base_trade_in_value,
    original_price,
    market_demand,
    supply_level,
    competitor_price,
    is_active,
    created_at
"#;

/// Repository for trade-in model data access
pub struct TradeInModelRepository {
    pool: PgPool,
}

impl TradeInModelRepository {
    /// Create a new TradeInModelRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new trade-in model; records breaking the pricing invariant are
    /// rejected before reaching the database
    pub async fn create(&self, model: &NewTradeInModel) -> Result<TradeInModel, RepositoryError> {
        model.validate().map_err(RepositoryError::ConstraintViolation)?;

        let sql = format!(
            r#"
            INSERT INTO trade_in_models (
                brand, name, release_date, base_trade_in_value, original_price,
                market_demand, supply_level, competitor_price, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            MODEL_COLUMNS
        );

        sqlx::query_as::<_, TradeInModel>(&sql)
            .bind(&model.brand)
            .bind(&model.name)
            .bind(model.release_date)
            .bind(model.base_trade_in_value)
            .bind(model.original_price)
            .bind(model.market_demand)
            .bind(model.supply_level)
            .bind(model.competitor_price)
            .bind(model.is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    /// Find a model by UUID, active or not
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<TradeInModel>> {
        let sql = format!("SELECT {} FROM trade_in_models WHERE id = $1", MODEL_COLUMNS);

        sqlx::query_as::<_, TradeInModel>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Find all active models for the storefront listing
    pub async fn find_active(&self) -> SqlxResult<Vec<TradeInModel>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM trade_in_models
            WHERE is_active = TRUE
            ORDER BY brand ASC, name ASC
            "#,
            MODEL_COLUMNS
        );

        sqlx::query_as::<_, TradeInModel>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Toggle whether a model shows up in listings
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> SqlxResult<TradeInModel> {
        let sql = format!(
            "UPDATE trade_in_models SET is_active = $2 WHERE id = $1 RETURNING {}",
            MODEL_COLUMNS
        );

        sqlx::query_as::<_, TradeInModel>(&sql)
            .bind(id)
            .bind(is_active)
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sqlx::postgres::PgPoolOptions;

    fn new_model(base: i64, original: i64) -> NewTradeInModel {
        NewTradeInModel {
            brand: "Google".to_string(),
            name: "Pixel 8a".to_string(),
            release_date: NaiveDate::from_ymd_opt(2024, 5, 14).unwrap(),
            base_trade_in_value: Decimal::new(base, 0),
            original_price: Decimal::new(original, 0),
            market_demand: Decimal::new(6, 1),
            supply_level: Decimal::new(4, 1),
            competitor_price: Decimal::new(300, 0),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_model_without_a_round_trip() {
        // nothing listens here; a query would fail with a connection error instead
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://tradein@127.0.0.1:1/unreachable")
            .unwrap();
        let repo = TradeInModelRepository::new(pool);

        let err = repo.create(&new_model(350, 100)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintViolation(_)));

        let err = repo.create(&new_model(0, 500)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
    }
}
