pub mod market_condition_repository;
pub mod pricing_history_repository;
pub mod store;
pub mod trade_in_model_repository;

// Re-export all repositories for convenient access
pub use market_condition_repository::MarketConditionRepository;
pub use pricing_history_repository::PricingHistoryRepository;
pub use store::{PgTradeInCatalog, PricingHistoryWriter, TradeInCatalog};
pub use trade_in_model_repository::TradeInModelRepository;
