#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tradein_pricing::error::RepositoryError;
use tradein_pricing::models::*;
use tradein_pricing::repositories::*;
use uuid::Uuid;

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Base 400, original 600, demand = supply = 0.5, competitor 400
pub fn model_released(release_date: NaiveDate) -> TradeInModel {
    TradeInModel {
        id: Uuid::new_v4(),
        brand: "Apple".to_string(),
        name: "iPhone 15".to_string(),
        release_date,
        base_trade_in_value: Decimal::new(400, 0),
        original_price: Decimal::new(600, 0),
        market_demand: Decimal::new(5, 1),
        supply_level: Decimal::new(5, 1),
        competitor_price: Decimal::new(400, 0),
        is_active: true,
        created_at: at(2020, 1, 1).naive_utc(),
    }
}

/// A spread of ages and price points used by the property tests
pub fn model_fleet() -> Vec<TradeInModel> {
    let mut fleet = Vec::new();

    fleet.push(model_released(date(2026, 3, 1)));

    let mut flagship = model_released(date(2025, 9, 19));
    flagship.base_trade_in_value = Decimal::new(750, 0);
    flagship.original_price = Decimal::new(1199, 0);
    flagship.market_demand = Decimal::new(9, 1);
    flagship.supply_level = Decimal::new(2, 1);
    flagship.competitor_price = Decimal::new(820, 0);
    fleet.push(flagship);

    let mut midrange = model_released(date(2024, 2, 10));
    midrange.brand = "Samsung".to_string();
    midrange.name = "Galaxy A55".to_string();
    midrange.base_trade_in_value = Decimal::new(180, 0);
    midrange.original_price = Decimal::new(449, 0);
    midrange.market_demand = Decimal::new(35, 2);
    midrange.supply_level = Decimal::new(8, 1);
    midrange.competitor_price = Decimal::new(120, 0);
    fleet.push(midrange);

    let mut vintage = model_released(date(2015, 9, 25));
    vintage.name = "iPhone 6s".to_string();
    vintage.base_trade_in_value = Decimal::new(250, 0);
    vintage.original_price = Decimal::new(649, 0);
    vintage.competitor_price = Decimal::new(60, 0);
    fleet.push(vintage);

    fleet
}

/// In-memory catalog standing in for Postgres
pub struct InMemoryCatalog {
    pub models: Mutex<HashMap<Uuid, TradeInModel>>,
    pub market_conditions: Mutex<Vec<MarketCondition>>,
    pub fail_market_conditions: bool,
    pub market_condition_calls: AtomicU64,
}

impl InMemoryCatalog {
    pub fn with_models(models: Vec<TradeInModel>) -> Self {
        Self {
            models: Mutex::new(models.into_iter().map(|m| (m.id, m)).collect()),
            market_conditions: Mutex::new(Vec::new()),
            fail_market_conditions: false,
            market_condition_calls: AtomicU64::new(0),
        }
    }

    pub fn failing_market_conditions(mut self) -> Self {
        self.fail_market_conditions = true;
        self
    }
}

#[async_trait]
impl TradeInCatalog for InMemoryCatalog {
    async fn find_model(&self, id: Uuid) -> Result<Option<TradeInModel>, RepositoryError> {
        Ok(self.models.lock().await.get(&id).cloned())
    }

    async fn list_active_models(&self) -> Result<Vec<TradeInModel>, RepositoryError> {
        let mut active: Vec<TradeInModel> = self
            .models
            .lock()
            .await
            .values()
            .filter(|m| m.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| (&a.brand, &a.name).cmp(&(&b.brand, &b.name)));
        Ok(active)
    }

    async fn list_active_market_conditions(&self) -> Result<Vec<MarketCondition>, RepositoryError> {
        self.market_condition_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_market_conditions {
            return Err(RepositoryError::Unavailable("market feed offline".to_string()));
        }
        Ok(self.market_conditions.lock().await.clone())
    }
}

/// Keeps every appended entry
#[derive(Default)]
pub struct RecordingWriter {
    pub entries: Mutex<Vec<PricingHistoryEntry>>,
}

#[async_trait]
impl PricingHistoryWriter for RecordingWriter {
    fn writer_tag(&self) -> &'static str {
        "recording"
    }

    async fn append(&self, entry: &PricingHistoryEntry) -> Result<(), RepositoryError> {
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }
}

/// Rejects every write
#[derive(Default)]
pub struct FailingWriter {
    pub attempts: AtomicU64,
}

#[async_trait]
impl PricingHistoryWriter for FailingWriter {
    fn writer_tag(&self) -> &'static str {
        "failing"
    }

    async fn append(&self, _entry: &PricingHistoryEntry) -> Result<(), RepositoryError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(RepositoryError::Unavailable("pricing_history is read-only".to_string()))
    }
}

/// Postgres repositories over a test pool
pub struct TestDatabase {
    pub pool: PgPool,
    pub model_repo: Arc<TradeInModelRepository>,
    pub market_repo: Arc<MarketConditionRepository>,
    pub history_repo: Arc<PricingHistoryRepository>,
}

impl TestDatabase {
    /// Create TestDatabase from an existing pool (useful with sqlx::test)
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool: pool.clone(),
            model_repo: Arc::new(TradeInModelRepository::new(pool.clone())),
            market_repo: Arc::new(MarketConditionRepository::new(pool.clone())),
            history_repo: Arc::new(PricingHistoryRepository::new(pool)),
        }
    }

    pub fn catalog(&self) -> PgTradeInCatalog {
        PgTradeInCatalog::new(self.model_repo.clone(), self.market_repo.clone())
    }
}

pub fn new_model(name: &str, is_active: bool) -> NewTradeInModel {
    NewTradeInModel {
        brand: "Google".to_string(),
        name: name.to_string(),
        release_date: date(2024, 10, 4),
        base_trade_in_value: Decimal::new(350, 0),
        original_price: Decimal::new(799, 0),
        market_demand: Decimal::new(6, 1),
        supply_level: Decimal::new(4, 1),
        competitor_price: Decimal::new(330, 0),
        is_active,
    }
}
