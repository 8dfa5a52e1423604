//! Domain models for the trade-in pricing backend.
//!
//! Database-backed records plus the caller-supplied device enumerations.

pub mod device;
pub mod market_condition;
pub mod pricing_history;
pub mod trade_in_model;

// Re-export all models for convenient access
pub use device::{DeviceCondition, StorageCapacity};
pub use market_condition::MarketCondition;
pub use pricing_history::PricingHistoryEntry;
pub use trade_in_model::{NewTradeInModel, TradeInModel};
