pub mod audit;
pub mod history_recorder;
pub mod trade_in_service;

pub use audit::AuditTrailService;
pub use history_recorder::{PricingEventSender, PricingHistoryRecorder, RecorderStats};
pub use trade_in_service::{TradeInQuote, TradeInService};
