use crate::error::{AppError, AppResult, RepositoryError};
use crate::models::PricingHistoryEntry;
use crate::repositories::PricingHistoryWriter;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub timestamp: i64,
    pub event_type: String, // "trade_in_quoted"
    pub model_id: Option<Uuid>,
    pub details: serde_json::Value,
}

/// Audit trail service writing one JSON line per pricing event.
///
/// Lines go to `audit_<date>.log` for the UTC date of the write; the file is
/// switched on the first write after midnight.
pub struct AuditTrailService {
    log_directory: PathBuf,
    current: Mutex<Option<DailyLog>>,
}

struct DailyLog {
    date: NaiveDate,
    file: File,
}

impl AuditTrailService {
    /// Create a new audit trail service
    pub fn new(log_directory: PathBuf) -> AppResult<Self> {
        std::fs::create_dir_all(&log_directory)
            .map_err(|e| AppError::Message(format!("Failed to create log directory: {}", e)))?;

        info!("Audit trail initialized in {:?}", log_directory);

        Ok(Self {
            log_directory,
            current: Mutex::new(None),
        })
    }

    /// File receiving the lines written on `date`
    pub fn log_file_for(&self, date: NaiveDate) -> PathBuf {
        self.log_directory
            .join(format!("audit_{}.log", date.format("%Y-%m-%d")))
    }

    /// Log an audit entry
    pub async fn log(&self, entry: AuditLogEntry) -> AppResult<()> {
        let json = serde_json::to_string(&entry)?;
        self.write_line(&json, Utc::now().date_naive()).await
    }

    async fn write_line(&self, line: &str, date: NaiveDate) -> AppResult<()> {
        let mut current = self.current.lock().await;

        if current.as_ref().map(|log| log.date) != Some(date) {
            let path = self.log_file_for(date);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::Message(format!("Failed to open audit log file: {}", e)))?;
            debug!("Audit trail writing to {:?}", path);
            *current = Some(DailyLog { date, file });
        }

        let Some(log) = current.as_mut() else {
            return Ok(());
        };

        writeln!(log.file, "{}", line)
            .map_err(|e| AppError::Message(format!("Failed to write audit log: {}", e)))?;

        log.file
            .flush()
            .map_err(|e| AppError::Message(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Log a trade-in quote
    pub async fn log_trade_in_quoted(&self, quote: &PricingHistoryEntry) -> AppResult<()> {
        let entry = AuditLogEntry {
            timestamp: quote.calculated_at.and_utc().timestamp(),
            event_type: "trade_in_quoted".to_string(),
            model_id: Some(quote.model_id),
            details: serde_json::json!({
                "quote_id": quote.id.to_string(),
                "storage_capacity": quote.storage_capacity,
                "device_condition": quote.device_condition,
                "base_price": quote.base_price.to_string(),
                "time_decay": quote.time_decay.to_string(),
                "supply_demand_multiplier": quote.supply_demand_multiplier.to_string(),
                "market_position_multiplier": quote.market_position_multiplier.to_string(),
                "seasonal_multiplier": quote.seasonal_multiplier.to_string(),
                "storage_multiplier": quote.storage_multiplier.to_string(),
                "condition_multiplier": quote.condition_multiplier.to_string(),
                "final_value": quote.final_value.to_string(),
            }),
        };

        self.log(entry).await
    }
}

#[async_trait]
impl PricingHistoryWriter for AuditTrailService {
    fn writer_tag(&self) -> &'static str {
        "audit_file"
    }

    async fn append(&self, entry: &PricingHistoryEntry) -> Result<(), RepositoryError> {
        self.log_trade_in_quoted(entry)
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_lines_follow_the_write_date() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditTrailService::new(dir.path().to_path_buf()).unwrap();

        audit.write_line("{\"n\":1}", date(2026, 3, 14)).await.unwrap();
        audit.write_line("{\"n\":2}", date(2026, 3, 14)).await.unwrap();
        audit.write_line("{\"n\":3}", date(2026, 3, 15)).await.unwrap();

        let first = std::fs::read_to_string(audit.log_file_for(date(2026, 3, 14))).unwrap();
        let second = std::fs::read_to_string(audit.log_file_for(date(2026, 3, 15))).unwrap();
        assert_eq!(first.lines().count(), 2);
        assert_eq!(second.trim(), "{\"n\":3}");
        assert!(audit
            .log_file_for(date(2026, 3, 15))
            .ends_with("audit_2026-03-15.log"));
    }

    #[tokio::test]
    async fn test_no_file_until_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let audit = AuditTrailService::new(dir.path().join("audit")).unwrap();
        assert_eq!(std::fs::read_dir(dir.path().join("audit")).unwrap().count(), 0);

        audit.write_line("{}", date(2026, 1, 1)).await.unwrap();
        assert!(audit.log_file_for(date(2026, 1, 1)).exists());
    }
}
