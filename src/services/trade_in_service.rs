use crate::error::{AppError, AppResult};
use crate::models::{
    DeviceCondition, MarketCondition, PricingHistoryEntry, StorageCapacity, TradeInModel,
};
use crate::pricing::{calculate_trade_in_value, TradeInCalculation};
use crate::repositories::TradeInCatalog;
use crate::services::PricingEventSender;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One cell of a model's quote grid
#[derive(Debug, Clone, Serialize)]
pub struct TradeInQuote {
    pub storage: StorageCapacity,
    pub condition: DeviceCondition,
    pub calculation: TradeInCalculation,
}

/// Service that prices trade-ins against the catalog
pub struct TradeInService {
    catalog: Arc<dyn TradeInCatalog>,
    history: Option<PricingEventSender>,
}

impl TradeInService {
    pub fn new(catalog: Arc<dyn TradeInCatalog>) -> Self {
        Self {
            catalog,
            history: None,
        }
    }

    /// Emit an audit event for every successful quote
    pub fn with_history(mut self, sender: PricingEventSender) -> Self {
        self.history = Some(sender);
        self
    }

    /// Price a trade-in at the current wall-clock time
    pub async fn calculate(
        &self,
        model_id: Uuid,
        storage: &StorageCapacity,
        condition: &DeviceCondition,
    ) -> AppResult<TradeInCalculation> {
        self.calculate_at(model_id, storage, condition, Utc::now()).await
    }

    /// Price a trade-in as of `as_of`.
    ///
    /// Fails with [`AppError::NotFound`] for an unknown model, in which case no
    /// audit event is emitted. Market condition and audit failures never fail
    /// the quote.
    pub async fn calculate_at(
        &self,
        model_id: Uuid,
        storage: &StorageCapacity,
        condition: &DeviceCondition,
        as_of: DateTime<Utc>,
    ) -> AppResult<TradeInCalculation> {
        info!(
            "Calculating trade-in: model={}, storage={}, condition={}",
            model_id, storage, condition
        );

        let model = self.load_model(model_id).await?;
        // Extension hook: loaded for upcoming market adjustments, not priced in yet
        let _market_conditions = self.load_market_conditions().await;

        if !storage.is_recognized() {
            debug!("Unknown storage capacity {:?}, using neutral multiplier", storage.as_str());
        }
        if !condition.is_recognized() {
            debug!("Unknown device condition {:?}, using half-value multiplier", condition.as_str());
        }

        let calculation = calculate_trade_in_value(&model, storage, condition, as_of)?;

        self.emit(PricingHistoryEntry::from_calculation(
            model.id,
            storage,
            condition,
            &calculation,
            as_of.naive_utc(),
        ));

        info!(
            "Trade-in quote for {}: {} ({} {})",
            model.display_name(),
            calculation.final_value,
            storage,
            condition
        );

        Ok(calculation)
    }

    /// Every named storage and condition pair for one model, evaluated at a
    /// single instant. Grid quotes are previews and are not audited.
    pub async fn quote_grid(&self, model_id: Uuid, as_of: DateTime<Utc>) -> AppResult<Vec<TradeInQuote>> {
        let model = self.load_model(model_id).await?;

        let mut quotes = Vec::with_capacity(StorageCapacity::NAMED.len() * DeviceCondition::NAMED.len());
        for storage in StorageCapacity::NAMED.iter() {
            for condition in DeviceCondition::NAMED.iter() {
                let calculation = calculate_trade_in_value(&model, storage, condition, as_of)?;
                quotes.push(TradeInQuote {
                    storage: storage.clone(),
                    condition: condition.clone(),
                    calculation,
                });
            }
        }

        Ok(quotes)
    }

    /// Models shown in storefront listings; inactive ones are filtered out
    pub async fn list_active_models(&self) -> AppResult<Vec<TradeInModel>> {
        Ok(self.catalog.list_active_models().await?)
    }

    async fn load_model(&self, model_id: Uuid) -> AppResult<TradeInModel> {
        self.catalog
            .find_model(model_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Trade-in model {}", model_id)))
    }

    async fn load_market_conditions(&self) -> Vec<MarketCondition> {
        match self.catalog.list_active_market_conditions().await {
            Ok(conditions) => {
                debug!("Loaded {} active market conditions", conditions.len());
                conditions
            }
            Err(e) => {
                warn!("Market conditions unavailable, continuing without: {}", e);
                Vec::new()
            }
        }
    }

    fn emit(&self, entry: PricingHistoryEntry) {
        let Some(sender) = &self.history else {
            return;
        };
        let model_id = entry.model_id;
        match sender.try_send(entry) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("Pricing history queue is full; dropping audit record for model {}", model_id);
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Pricing history recorder is gone; dropping audit record for model {}", model_id);
            }
        }
    }
}
