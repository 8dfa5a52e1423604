//! Trade-in pricing backend library
//!
//! This module exposes the backend components for use by tests and other consumers.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod pricing;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repositories::*;
use services::{PricingEventSender, TradeInService};
use std::sync::Arc;

/// Application state: the quote service over Postgres plus the history
/// repository for read-back
pub struct AppState {
    pub history_repo: Arc<PricingHistoryRepository>,
    pub trade_in_service: Arc<TradeInService>,
}

impl AppState {
    /// Wire the repositories into the quote service; quotes are audited
    /// through `history`
    pub fn new(pool: sqlx::PgPool, history: PricingEventSender) -> Self {
        let model_repo = Arc::new(TradeInModelRepository::new(pool.clone()));
        let market_repo = Arc::new(MarketConditionRepository::new(pool.clone()));
        let catalog = Arc::new(PgTradeInCatalog::new(model_repo, market_repo));

        Self {
            history_repo: Arc::new(PricingHistoryRepository::new(pool)),
            trade_in_service: Arc::new(TradeInService::new(catalog).with_history(history)),
        }
    }
}
