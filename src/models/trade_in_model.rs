use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Device model that can be traded in, with the static attributes the pricing
/// formula reads. The engine never mutates these records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TradeInModel {
    pub id: Uuid,
    pub brand: String,
    pub name: String,
    pub release_date: NaiveDate,
    pub base_trade_in_value: Decimal, // NUMERIC(10, 2), pre-decay reference value
    pub original_price: Decimal,      // NUMERIC(10, 2), retail price at launch
    pub market_demand: Decimal,       // NUMERIC(4, 3), 0..1 score
    pub supply_level: Decimal,        // NUMERIC(4, 3), 0..1 score
    pub competitor_price: Decimal,    // NUMERIC(10, 2)
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Fields needed to register a new trade-in model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTradeInModel {
    pub brand: String,
    pub name: String,
    pub release_date: NaiveDate,
    pub base_trade_in_value: Decimal,
    pub original_price: Decimal,
    pub market_demand: Decimal,
    pub supply_level: Decimal,
    pub competitor_price: Decimal,
    pub is_active: bool,
}

impl NewTradeInModel {
    /// Check the record invariant: `base_trade_in_value > 0` and
    /// `original_price >= base_trade_in_value`
    pub fn validate(&self) -> Result<(), String> {
        if self.base_trade_in_value <= Decimal::ZERO {
            return Err("base_trade_in_value must be positive".to_string());
        }
        if self.original_price < self.base_trade_in_value {
            return Err("original_price must be at least base_trade_in_value".to_string());
        }
        if self.market_demand < Decimal::ZERO || self.supply_level < Decimal::ZERO {
            return Err("market_demand and supply_level must not be negative".to_string());
        }
        Ok(())
    }
}

impl TradeInModel {
    /// Display label, e.g. "Apple iPhone 15 Pro"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }
}

impl From<NewTradeInModel> for TradeInModel {
    fn from(new: NewTradeInModel) -> Self {
        Self {
            id: Uuid::new_v4(),
            brand: new.brand,
            name: new.name,
            release_date: new.release_date,
            base_trade_in_value: new.base_trade_in_value,
            original_price: new.original_price,
            market_demand: new.market_demand,
            supply_level: new.supply_level,
            competitor_price: new.competitor_price,
            is_active: new.is_active,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
