//! Seams between the pricing service and whatever stores the data.
//!
//! The Postgres repositories implement these; tests plug in in-memory fakes.

use crate::error::RepositoryError;
use crate::models::{MarketCondition, PricingHistoryEntry, TradeInModel};
use crate::repositories::{
    MarketConditionRepository, PricingHistoryRepository, TradeInModelRepository,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Read side: model records and market snapshots
#[async_trait]
pub trait TradeInCatalog: Send + Sync + 'static {
    /// Direct lookup; inactive models are returned too
    async fn find_model(&self, id: Uuid) -> Result<Option<TradeInModel>, RepositoryError>;

    /// Models shown in storefront listings
    async fn list_active_models(&self) -> Result<Vec<TradeInModel>, RepositoryError>;

    async fn list_active_market_conditions(&self) -> Result<Vec<MarketCondition>, RepositoryError>;
}

/// Write side: destination for pricing audit records
#[async_trait]
pub trait PricingHistoryWriter: Send + Sync + 'static {
    fn writer_tag(&self) -> &'static str {
        "unknown"
    }

    async fn append(&self, entry: &PricingHistoryEntry) -> Result<(), RepositoryError>;
}

/// Postgres-backed catalog over the model and market condition repositories
pub struct PgTradeInCatalog {
    model_repo: Arc<TradeInModelRepository>,
    market_repo: Arc<MarketConditionRepository>,
}

impl PgTradeInCatalog {
    pub fn new(
        model_repo: Arc<TradeInModelRepository>,
        market_repo: Arc<MarketConditionRepository>,
    ) -> Self {
        Self {
            model_repo,
            market_repo,
        }
    }
}

#[async_trait]
impl TradeInCatalog for PgTradeInCatalog {
    async fn find_model(&self, id: Uuid) -> Result<Option<TradeInModel>, RepositoryError> {
        Ok(self.model_repo.find_by_id(id).await?)
    }

    async fn list_active_models(&self) -> Result<Vec<TradeInModel>, RepositoryError> {
        Ok(self.model_repo.find_active().await?)
    }

    async fn list_active_market_conditions(&self) -> Result<Vec<MarketCondition>, RepositoryError> {
        Ok(self.market_repo.find_active().await?)
    }
}

#[async_trait]
impl PricingHistoryWriter for PricingHistoryRepository {
    fn writer_tag(&self) -> &'static str {
        "postgres"
    }

    async fn append(&self, entry: &PricingHistoryEntry) -> Result<(), RepositoryError> {
        Ok(PricingHistoryRepository::append(self, entry).await?)
    }
}
