use crate::models::{DeviceCondition, StorageCapacity};
use crate::pricing::TradeInCalculation;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only audit record of one trade-in quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PricingHistoryEntry {
    pub id: Uuid,
    pub model_id: Uuid,
    pub storage_capacity: String, // as supplied, unknown labels included
    pub device_condition: String,
    pub base_price: Decimal,
    pub time_decay: Decimal,
    pub supply_demand_multiplier: Decimal,
    pub market_position_multiplier: Decimal,
    pub seasonal_multiplier: Decimal,
    pub storage_multiplier: Decimal,
    pub condition_multiplier: Decimal,
    pub final_value: Decimal,
    pub calculated_at: NaiveDateTime,
}

impl PricingHistoryEntry {
    /// Capture a finished calculation for the audit trail
    pub fn from_calculation(
        model_id: Uuid,
        storage: &StorageCapacity,
        condition: &DeviceCondition,
        calculation: &TradeInCalculation,
        calculated_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            model_id,
            storage_capacity: storage.as_str().to_string(),
            device_condition: condition.as_str().to_string(),
            base_price: calculation.base_price,
            time_decay: calculation.time_decay,
            supply_demand_multiplier: calculation.supply_demand_multiplier,
            market_position_multiplier: calculation.market_position_multiplier,
            seasonal_multiplier: calculation.seasonal_multiplier,
            storage_multiplier: calculation.storage_value,
            condition_multiplier: calculation.condition_multiplier,
            final_value: calculation.final_value,
            calculated_at,
        }
    }
}
