pub mod trade_in;

pub use trade_in::{
    calculate_trade_in_value, months_since_release, seasonal_multiplier, time_decay,
    PricingError, PricingResult, TradeInCalculation,
};
