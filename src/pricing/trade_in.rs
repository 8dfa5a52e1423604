use crate::models::{DeviceCondition, StorageCapacity, TradeInModel};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for trade-in pricing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Adjusted supply level is zero, so the supply/demand ratio is undefined
    #[error("supply level is zero; supply/demand ratio is undefined")]
    ZeroSupply,

    /// Decayed base value is zero, so the market position is undefined
    #[error("base value is zero; market position is undefined")]
    ZeroBaseValue,
}

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// 30-day month in milliseconds
const MILLIS_PER_MONTH: i64 = 30 * 24 * 60 * 60 * 1000;

/// Payouts are quoted in steps of this many currency units
const ROUNDING_STEP: u32 = 5;

/// Priced trade-in offer and the breakdown that produced it.
///
/// Every fractional field is rounded to 2 decimals; `final_value` is a
/// multiple of 5. `market_demand` and `supply_level` are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInCalculation {
    pub base_price: Decimal,
    pub time_decay: Decimal,
    pub supply_demand_multiplier: Decimal,
    pub market_position_multiplier: Decimal,
    pub seasonal_multiplier: Decimal,
    pub storage_value: Decimal,
    pub condition_multiplier: Decimal,
    pub supply_demand_ratio: Decimal,
    pub market_position: Decimal,
    pub final_value: Decimal,
    pub competitor_price: Decimal,
    pub market_demand: Decimal,
    pub supply_level: Decimal,
    /// Whole months, floored; `-1` for a model whose release date is still ahead
    pub months_since_release: i64,
    pub min_value: Decimal,
    pub max_value: Decimal,
}

/// Fractional 30-day months between the release date (midnight UTC) and `as_of`.
/// Negative for release dates in the future.
pub fn months_since_release(release_date: NaiveDate, as_of: DateTime<Utc>) -> Decimal {
    let released = release_date.and_time(NaiveTime::default());
    let elapsed = as_of.naive_utc() - released;
    Decimal::from(elapsed.num_milliseconds()) / Decimal::from(MILLIS_PER_MONTH)
}

/// 3% decay per month, floored at 40% of the base value
pub fn time_decay(months: Decimal) -> Decimal {
    (Decimal::ONE - months * Decimal::new(3, 2)).max(Decimal::new(4, 1))
}

/// Seasonal adjustment for a 0-indexed calendar month.
///
/// The checks run in order and a later match overrides an earlier one, so
/// September and October (launch window) take 1.20 over the holiday 1.15.
pub fn seasonal_multiplier(month0: u32) -> Decimal {
    let mut multiplier = Decimal::ONE;

    // holiday season, Sep-Dec
    if (8..=11).contains(&month0) {
        multiplier = Decimal::new(115, 2);
    }
    // launch window, Sep-Oct
    if (8..=9).contains(&month0) {
        multiplier = Decimal::new(120, 2);
    }
    // post-holiday slump, Jan-Feb
    if month0 <= 1 {
        multiplier = Decimal::new(90, 2);
    }
    // summer lull, Jun-Aug
    if (5..=7).contains(&month0) {
        multiplier = Decimal::new(95, 2);
    }

    multiplier
}

/// Demand is strongest for new devices
fn demand_age_factor(months: Decimal) -> Decimal {
    if months <= Decimal::from(6) {
        Decimal::new(13, 1)
    } else if months <= Decimal::from(12) {
        Decimal::new(11, 1)
    } else if months <= Decimal::from(24) {
        Decimal::new(9, 1)
    } else {
        Decimal::new(7, 1)
    }
}

/// Supply is scarce for new devices and abundant for old ones
fn supply_age_factor(months: Decimal) -> Decimal {
    if months <= Decimal::from(6) {
        Decimal::new(3, 1)
    } else if months <= Decimal::from(12) {
        Decimal::new(6, 1)
    } else if months <= Decimal::from(24) {
        Decimal::new(8, 1)
    } else {
        Decimal::ONE
    }
}

fn supply_demand_multiplier(ratio: Decimal) -> Decimal {
    if ratio > Decimal::from(2) {
        Decimal::new(120, 2)
    } else if ratio > Decimal::new(15, 1) {
        Decimal::new(115, 2)
    } else if ratio > Decimal::ONE {
        Decimal::new(105, 2)
    } else if ratio > Decimal::new(5, 1) {
        Decimal::new(95, 2)
    } else {
        Decimal::new(85, 2)
    }
}

fn market_position_multiplier(position: Decimal) -> Decimal {
    if position > Decimal::new(11, 1) {
        Decimal::new(108, 2)
    } else if position > Decimal::new(9, 1) {
        Decimal::new(102, 2)
    } else {
        Decimal::new(98, 2)
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Nearest multiple of [`ROUNDING_STEP`], halves rounding up
fn round_to_step(value: Decimal) -> Decimal {
    let step = Decimal::from(ROUNDING_STEP);
    (value / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step
}

/// Price a trade-in for `model` in the given storage and condition, as of `as_of`.
///
/// Inactive models are priced like any other; the active flag only filters
/// listings. Unknown storage prices at 1.0 and unknown condition at 0.5.
///
/// # Errors
/// [`PricingError::ZeroSupply`] when the model's supply level is zero and
/// [`PricingError::ZeroBaseValue`] when the decayed base value is zero. Neither
/// can happen for a model satisfying `base_trade_in_value > 0` with non-zero supply.
pub fn calculate_trade_in_value(
    model: &TradeInModel,
    storage: &StorageCapacity,
    condition: &DeviceCondition,
    as_of: DateTime<Utc>,
) -> PricingResult<TradeInCalculation> {
    let months = months_since_release(model.release_date, as_of);
    let decay = time_decay(months);
    let seasonal = seasonal_multiplier(as_of.month0());

    let market_demand = model.market_demand * demand_age_factor(months);
    let supply_level = model.supply_level * supply_age_factor(months);

    let storage_multiplier = storage.multiplier();
    let condition_multiplier = condition.multiplier();

    let base_value = model.base_trade_in_value * decay;

    if supply_level.is_zero() {
        return Err(PricingError::ZeroSupply);
    }
    let ratio = market_demand / supply_level;
    let sd_multiplier = supply_demand_multiplier(ratio);

    if base_value.is_zero() {
        return Err(PricingError::ZeroBaseValue);
    }
    let position = model.competitor_price / base_value;
    let mp_multiplier = market_position_multiplier(position);

    let raw_value = base_value
        * sd_multiplier
        * mp_multiplier
        * seasonal
        * storage_multiplier
        * condition_multiplier;

    let max_value = (model.original_price * Decimal::new(7, 1)).min(raw_value * Decimal::new(13, 1));
    let min_value = (model.base_trade_in_value * Decimal::new(3, 1))
        .max(model.original_price * Decimal::new(1, 1));
    // floor applied last: when the bounds cross, the floor wins
    let clamped = raw_value.min(max_value).max(min_value);

    Ok(TradeInCalculation {
        base_price: round2(base_value),
        time_decay: round2(decay),
        supply_demand_multiplier: round2(sd_multiplier),
        market_position_multiplier: round2(mp_multiplier),
        seasonal_multiplier: round2(seasonal),
        storage_value: round2(storage_multiplier),
        condition_multiplier: round2(condition_multiplier),
        supply_demand_ratio: round2(ratio),
        market_position: round2(position),
        final_value: round_to_step(clamped),
        competitor_price: model.competitor_price,
        market_demand: round2(market_demand * Decimal::ONE_HUNDRED),
        supply_level: round2(supply_level * Decimal::ONE_HUNDRED),
        months_since_release: months.floor().to_i64().unwrap_or_default(),
        min_value: round2(min_value),
        max_value: round2(max_value),
    })
}
