use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Free-form market snapshot maintained by the storefront admins.
///
/// Loaded alongside every quote but not read by the formula yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MarketCondition {
    pub id: Uuid,
    pub is_active: bool,
    pub condition_data: Value, // JSONB stored as serde_json::Value
    pub created_at: NaiveDateTime,
}
